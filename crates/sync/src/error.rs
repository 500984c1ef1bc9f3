//! Mutation outcomes and the engine error taxonomy.
//!
//! Public mutation methods never panic and never leak a raw backend
//! error: they resolve to a [`Receipt`] (or [`Toggle`]) on success and a
//! [`SyncError`] otherwise. Every variant's `Display` is a message fit to
//! show a shopper.

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the mutation API.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The input was rejected before any mutation took place.
    #[error("{0}")]
    Validation(String),

    /// The operation requires a signed-in account.
    #[error("{0}")]
    Authorization(String),

    /// The backing store rejected the write; the optimistic update has
    /// been compensated and in-memory state matches what is persisted.
    #[error("something went wrong, please try again")]
    Persistence(#[source] StoreError),
}

impl SyncError {
    pub(crate) fn wishlist_signed_out() -> Self {
        Self::Authorization("Sign in to use your wishlist".to_owned())
    }
}

/// Successful mutation receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Human-readable confirmation, e.g. "Cargo Shorts added to cart".
    pub message: String,
}

impl Receipt {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a wishlist toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    /// `true` when the product was added, `false` when removed.
    pub added: bool,
    pub message: String,
}
