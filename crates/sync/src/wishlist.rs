//! Wishlist sync controller.
//!
//! The wishlist is account-only: every mutation under an anonymous
//! identity fails fast with an authorization result and touches nothing.
//! Mutations are optimistic — membership changes in memory first, the
//! write follows, and a failed write rolls the change back.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use atelier_core::{Identity, Product, ProductId, WishlistEntry};

use crate::binding::Binding;
use crate::collection::EntityCollection;
use crate::error::{Receipt, SyncError, Toggle};
use crate::store::{DocumentStore, LocalStore};

/// The wishlist controller.
///
/// Cheaply cloneable; clones observe and mutate the same collection.
pub struct WishlistSync<D, L> {
    inner: Arc<Binding<WishlistEntry, D, L>>,
}

impl<D, L> Clone for WishlistSync<D, L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, L> WishlistSync<D, L>
where
    D: DocumentStore,
    L: LocalStore,
{
    /// Create a controller bound to the given stores.
    #[must_use]
    pub fn new(docs: D, local: L) -> Self {
        Self {
            inner: Arc::new(Binding::new(docs, local)),
        }
    }

    /// Snapshot of the wishlisted product IDs, in insertion order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.inner
            .collection()
            .into_items()
            .into_iter()
            .map(|entry| entry.product_id)
            .collect()
    }

    /// Whether a product is currently wishlisted.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.inner.collection().contains(product_id)
    }

    /// Subscribe to collection changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EntityCollection<WishlistEntry>> {
        self.inner.subscribe()
    }

    /// The identity the wishlist is currently bound to.
    #[must_use]
    pub fn identity(&self) -> Identity {
        self.inner.identity()
    }

    /// Apply one identity transition (see [`crate::binding`]).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Persistence`] when the account state cannot
    /// be fetched; the wishlist is left untouched in that case.
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

    fn require_account(&self) -> Result<(), SyncError> {
        if self.inner.identity().is_anonymous() {
            return Err(SyncError::wishlist_signed_out());
        }
        Ok(())
    }

    /// Add or remove a product, whichever its current membership calls
    /// for.
    ///
    /// The membership change is optimistic; a failed write rolls it
    /// back before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Authorization`] while anonymous and
    /// [`SyncError::Persistence`] when the write fails.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn toggle(&self, product: &Product) -> Result<Toggle, SyncError> {
        self.require_account()?;

        if self.contains(&product.id) {
            self.inner
                .mutate(|wishlist| wishlist.remove_if(|entry| entry.product_id == product.id));

            match self.inner.persist().await {
                Ok(()) => Ok(Toggle {
                    added: false,
                    message: format!("{} removed from wishlist", product.name),
                }),
                Err(e) => {
                    self.inner
                        .mutate(|wishlist| wishlist.insert(WishlistEntry::new(product.id.clone())));
                    Err(SyncError::Persistence(e))
                }
            }
        } else {
            self.inner
                .mutate(|wishlist| wishlist.insert(WishlistEntry::new(product.id.clone())));

            match self.inner.persist().await {
                Ok(()) => Ok(Toggle {
                    added: true,
                    message: format!("{} added to wishlist", product.name),
                }),
                Err(e) => {
                    self.inner.mutate(|wishlist| {
                        wishlist.remove_if(|entry| entry.product_id == product.id);
                    });
                    Err(SyncError::Persistence(e))
                }
            }
        }
    }

    /// Add a product; already-present products are a quiet no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Authorization`] while anonymous and
    /// [`SyncError::Persistence`] when the write fails (the entry is
    /// removed again).
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn add(&self, product: &Product) -> Result<Receipt, SyncError> {
        self.require_account()?;

        if self.contains(&product.id) {
            return Ok(Receipt::new(format!(
                "{} is already in your wishlist",
                product.name
            )));
        }

        self.inner
            .mutate(|wishlist| wishlist.insert(WishlistEntry::new(product.id.clone())));

        match self.inner.persist().await {
            Ok(()) => Ok(Receipt::new(format!(
                "{} added to wishlist",
                product.name
            ))),
            Err(e) => {
                self.inner.mutate(|wishlist| {
                    wishlist.remove_if(|entry| entry.product_id == product.id);
                });
                Err(SyncError::Persistence(e))
            }
        }
    }

    /// Remove a product unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Authorization`] while anonymous and
    /// [`SyncError::Persistence`] when the write fails (membership is
    /// restored).
    #[instrument(skip(self, product_id), fields(product = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> Result<(), SyncError> {
        self.require_account()?;

        let removed = self
            .inner
            .mutate(|wishlist| wishlist.remove_if(|entry| entry.product_id == *product_id));

        match self.inner.persist().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner.mutate(|wishlist| {
                    for entry in removed {
                        wishlist.insert(entry);
                    }
                });
                Err(SyncError::Persistence(e))
            }
        }
    }

    /// Empty the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Authorization`] while anonymous and
    /// [`SyncError::Persistence`] when the write fails (membership is
    /// restored).
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), SyncError> {
        self.require_account()?;

        let previous = self.inner.mutate(|wishlist| {
            let snapshot = wishlist.clone();
            wishlist.clear();
            snapshot
        });

        match self.inner.persist().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.inner.mutate(|wishlist| *wishlist = previous);
                Err(SyncError::Persistence(e))
            }
        }
    }
}
