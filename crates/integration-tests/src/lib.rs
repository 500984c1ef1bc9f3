//! Integration tests for Atelier.
//!
//! Exercises the sync engine end to end against the in-memory store
//! backends: identity transitions and the sign-in merge, optimistic
//! mutation with compensation, and order submission.
//!
//! # Test Categories
//!
//! - `cart_sync` - cart mutations, merge-on-sign-in, account isolation
//! - `wishlist_sync` - account-only policy, toggle semantics, rollback
//! - `orders` - submission guards and the post-order cart clear
//!
//! This crate also hosts the shared fakes: [`FlakyDocumentStore`] for
//! failure injection and fixture constructors for products.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use atelier_core::{AccountId, Product, ProductId};
use atelier_sync::{DocumentStore, MemoryDocumentStore, StoreError};

/// A document store whose writes can be made to fail on demand.
///
/// Reads always pass through so transitions can load state; `set_field`
/// fails while the flag is up, which is exactly the window the
/// compensation paths care about.
#[derive(Clone)]
pub struct FlakyDocumentStore {
    inner: MemoryDocumentStore,
    fail_writes: Arc<AtomicBool>,
}

impl FlakyDocumentStore {
    #[must_use]
    pub fn new(inner: MemoryDocumentStore) -> Self {
        Self {
            inner,
            fail_writes: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start or stop failing writes.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store, for assertions.
    #[must_use]
    pub fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }
}

#[async_trait]
impl DocumentStore for FlakyDocumentStore {
    async fn get(&self, account: &AccountId) -> Result<Option<Value>, StoreError> {
        self.inner.get(account).await
    }

    async fn set_field(
        &self,
        account: &AccountId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_owned()));
        }
        self.inner.set_field(account, field, value).await
    }
}

/// Product fixture.
#[must_use]
pub fn product(id: &str, name: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: money(price),
        images: vec![format!("https://img.example/{id}.jpg")],
    }
}

/// Parse a decimal amount for assertions.
///
/// # Panics
///
/// Panics on a malformed amount; fixture input is literal.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn money(amount: &str) -> Decimal {
    Decimal::from_str_exact(amount).unwrap()
}
