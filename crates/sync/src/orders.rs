//! Order submission.
//!
//! The one operation that deliberately empties an authoritative cart:
//! snapshot the lines, submit the order, clear the cart on success.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{instrument, warn};

use atelier_core::{Customer, Identity, OrderDraft, OrderId, PaymentMethod};

use crate::cart::CartSync;
use crate::store::{DocumentStore, LocalStore, StoreError};

/// Sink for submitted orders.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Persist a new order and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any submission problem.
    async fn submit(&self, draft: &OrderDraft) -> Result<OrderId, StoreError>;
}

/// Errors surfaced by [`OrderService::place`].
#[derive(Debug, Error)]
pub enum OrderError {
    /// Orders require a signed-in account.
    #[error("You must be signed in to place an order")]
    SignedOut,

    /// There is nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The orders store rejected the submission; the cart is untouched.
    #[error("Failed to place order, please try again")]
    Submit(#[source] StoreError),
}

/// Builds and submits orders from the current cart.
pub struct OrderService<D, L, G> {
    cart: CartSync<D, L>,
    gateway: G,
}

impl<D, L, G> OrderService<D, L, G>
where
    D: DocumentStore,
    L: LocalStore,
    G: OrderGateway,
{
    #[must_use]
    pub fn new(cart: CartSync<D, L>, gateway: G) -> Self {
        Self { cart, gateway }
    }

    /// Place an order for the cart's current contents.
    ///
    /// Builds an immutable pending order (line snapshot, computed total,
    /// payment method, timestamps), submits it, and clears the cart. A
    /// failed submission leaves the cart untouched; a failed clear after
    /// a successful submission is logged and the order stands.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::SignedOut`] under an anonymous identity,
    /// [`OrderError::EmptyCart`] for an empty cart, and
    /// [`OrderError::Submit`] when the gateway rejects the order.
    #[instrument(skip(self, customer))]
    pub async fn place(
        &self,
        customer: Customer,
        payment_method: PaymentMethod,
    ) -> Result<OrderId, OrderError> {
        let Identity::Account(account) = self.cart.identity() else {
            return Err(OrderError::SignedOut);
        };

        let items = self.cart.lines();
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let draft = OrderDraft::new(account, customer, items, payment_method);
        let id = self
            .gateway
            .submit(&draft)
            .await
            .map_err(OrderError::Submit)?;

        if let Err(e) = self.cart.clear().await {
            warn!(order = %id, error = %e, "order placed but cart could not be cleared");
        }

        Ok(id)
    }
}
