//! Collaborator storage traits.
//!
//! The engine talks to two stores and never to a concrete provider:
//!
//! - [`LocalStore`] - device-scoped, durable key→JSON storage with
//!   synchronous reads and writes; holds guest state.
//! - [`DocumentStore`] - per-account document storage shared across a
//!   customer's devices; holds account state under named fields.
//!
//! Persistence is always a wholesale overwrite of a field (or local
//! key). There is no partial patch, no version token, and no server-side
//! transaction: when two overwrites race, the slower write wins and the
//! faster one's changes are lost. That last-writer-wins behavior is an
//! accepted property of the design, kept for fidelity with the systems
//! this engine fronts.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use atelier_core::AccountId;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Device-scoped durable key→JSON storage.
///
/// Synchronous by contract: guest state must be readable without I/O
/// suspension so identity transitions can inspect and drain it
/// atomically with respect to the in-memory mutation.
pub trait LocalStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be written.
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Delete `key`; deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be written.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Per-account document storage.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the whole account document, `None` when the account has
    /// no document yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend cannot be reached or
    /// the stored document cannot be decoded.
    async fn get(&self, account: &AccountId) -> Result<Option<Value>, StoreError>;

    /// Overwrite one field of the account document wholesale, creating
    /// the document when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the backend rejects the write.
    async fn set_field(
        &self,
        account: &AccountId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}
