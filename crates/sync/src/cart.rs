//! Cart sync controller.
//!
//! The cart supports guests: under an anonymous identity mutations
//! persist to the device-local store, after sign-in to the account
//! document. Every mutation lands in memory synchronously and is then
//! persisted; when the write fails, the mutation's inverse is applied
//! and the failure surfaced, so resolved calls always reflect what is
//! actually stored.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::instrument;

use atelier_core::{CartLine, Identity, LineKey, Product, ProductId};

use crate::binding::Binding;
use crate::collection::EntityCollection;
use crate::error::{Receipt, SyncError};
use crate::store::{DocumentStore, LocalStore};

/// The cart controller.
///
/// Cheaply cloneable; clones observe and mutate the same collection.
pub struct CartSync<D, L> {
    inner: Arc<Binding<CartLine, D, L>>,
}

impl<D, L> Clone for CartSync<D, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, L> CartSync<D, L>
where
    D: DocumentStore,
    L: LocalStore,
{
    /// Create a controller bound to the given stores.
    ///
    /// The collection starts empty; apply an identity (or hand the
    /// controller to [`run`](Self::run)) to load state.
    #[must_use]
    pub fn new(docs: D, local: L) -> Self {
        Self {
            inner: Arc::new(Binding::new(docs, local)),
        }
    }

    /// Snapshot of the current lines.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.inner.collection().into_items()
    }

    /// Subscribe to collection changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EntityCollection<CartLine>> {
        self.inner.subscribe()
    }

    /// The identity the cart is currently bound to.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.inner.identity()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines().iter().map(|line| line.quantity).sum()
    }

    /// Sum of `price × quantity` across all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines().iter().map(CartLine::subtotal).sum()
    }

    /// Apply one identity transition (see [`crate::binding`] for the
    /// transition table).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the account state cannot
    /// be fetched; the cart is left untouched in that case.
    pub async fn apply_identity(&self, next: Identity) -> Result<(), SyncError> {
        self.inner
            .apply_identity(next)
            .await
            .map_err(SyncError::Persistence)
    }

    /// Drive transitions from an identity channel until it closes.
    pub async fn run(&self, transitions: watch::Receiver<Identity>) {
        self.inner.run(transitions).await;
    }

    /// Add `quantity` units of a product in a size.
    ///
    /// Sums into an existing `(product, size)` line; new lines append.
    /// Guests may add to the cart — the line lands in the device-local
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] for a zero quantity and
    /// [`SyncError::Persistence`] when the write fails (the added
    /// quantity is taken back out).
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn add(
        &self,
        product: &Product,
        size: &str,
        quantity: u32,
    ) -> Result<Receipt, SyncError> {
        if quantity == 0 {
            return Err(SyncError::Validation(
                "quantity must be at least 1".to_owned(),
            ));
        }

        let line = CartLine::from_product(product, size, quantity);
        let key = line.line_key();
        self.inner.mutate(|cart| cart.insert(line));

        match self.inner.persist().await {
            Ok(()) => Ok(Receipt::new(format!("{} added to cart", product.name))),
            Err(e) => {
                self.inner
                    .mutate(|cart| apply_delta(cart, &key, -i64::from(quantity)));
                Err(SyncError::Persistence(e))
            }
        }
    }

    /// Add `delta` to the quantity of the matching line; a result of
    /// zero or less removes the line. Silently does nothing when no line
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the write fails (the
    /// previous quantity is restored).
    #[instrument(skip(self, product_id), fields(product = %product_id))]
    pub async fn change_quantity(
        &self,
        product_id: &ProductId,
        size: &str,
        delta: i64,
    ) -> Result<(), SyncError> {
        let key = LineKey::new(product_id.clone(), size);
        let Some(before) = self.inner.mutate(|cart| apply_delta(cart, &key, delta)) else {
            return Ok(());
        };

        match self.inner.persist().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner.mutate(|cart| cart.upsert(&key, |_| before.clone()));
                Err(SyncError::Persistence(e))
            }
        }
    }

    /// Remove the matching line unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the write fails (the
    /// removed line is re-inserted).
    #[instrument(skip(self, product_id), fields(product = %product_id))]
    pub async fn remove(&self, product_id: &ProductId, size: &str) -> Result<(), SyncError> {
        let key = LineKey::new(product_id.clone(), size);
        let removed = self
            .inner
            .mutate(|cart| cart.remove_if(|line| line.line_key() == key));

        match self.inner.persist().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner.mutate(|cart| {
                    for line in removed {
                        cart.insert(line);
                    }
                });
                Err(SyncError::Persistence(e))
            }
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the write fails (the
    /// previous lines are restored).
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), SyncError> {
        let previous = self.inner.mutate(|cart| {
            let snapshot = cart.clone();
            cart.clear();
            snapshot
        });

        match self.inner.persist().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner.mutate(|cart| *cart = previous);
                Err(SyncError::Persistence(e))
            }
        }
    }
}

/// Apply a signed quantity delta to the line with `key`, removing the
/// line when the result drops to zero or below. Returns the pre-change
/// line, `None` when no line matched.
fn apply_delta(
    cart: &mut EntityCollection<CartLine>,
    key: &LineKey,
    delta: i64,
) -> Option<CartLine> {
    let before = cart.get(key).cloned()?;
    let next = i64::from(before.quantity) + delta;

    if next <= 0 {
        cart.remove_if(|line| line.line_key() == *key);
    } else {
        cart.upsert(key, |existing| {
            let mut line = existing.cloned().unwrap_or_else(|| before.clone());
            line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
            line
        });
    }
    Some(before)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::ProductId;

    use super::*;

    fn line(id: &str, quantity: u32) -> CartLine {
        let product = Product {
            id: ProductId::new(id),
            name: id.to_owned(),
            price: Decimal::ONE,
            images: Vec::new(),
        };
        CartLine::from_product(&product, "M", quantity)
    }

    #[test]
    fn test_apply_delta_removes_at_zero() {
        let mut cart = EntityCollection::from_items(vec![line("p1", 2)]);
        let key = LineKey::new(ProductId::new("p1"), "M");

        let before = apply_delta(&mut cart, &key, -2).unwrap();
        assert_eq!(before.quantity, 2);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_apply_delta_missing_line_is_none() {
        let mut cart = EntityCollection::<CartLine>::new();
        let key = LineKey::new(ProductId::new("p1"), "M");
        assert!(apply_delta(&mut cart, &key, 1).is_none());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_apply_delta_adjusts_in_place() {
        let mut cart = EntityCollection::from_items(vec![line("p1", 2), line("p2", 1)]);
        let key = LineKey::new(ProductId::new("p1"), "M");

        apply_delta(&mut cart, &key, 3);
        let quantities: Vec<u32> = cart.items().iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![5, 1]);
    }
}
