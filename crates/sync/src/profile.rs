//! Saved try-on photo handle.
//!
//! Accounts can keep one reference photo for the try-on pipeline. Only
//! its URL lives on the account document (under `tryOnPhotoUrl`); the
//! bytes stay in whatever blob store the URL points into.

use serde_json::Value;
use tracing::warn;
use url::Url;

use atelier_core::AccountId;

use crate::store::{DocumentStore, StoreError};

/// Account-document field holding the saved photo URL.
pub const TRY_ON_PHOTO_FIELD: &str = "tryOnPhotoUrl";

/// Reads and overwrites the saved try-on photo URL.
#[derive(Debug, Clone)]
pub struct TryOnProfile<D> {
    docs: D,
}

impl<D: DocumentStore> TryOnProfile<D> {
    #[must_use]
    pub fn new(docs: D) -> Self {
        Self { docs }
    }

    /// The saved photo URL, `None` when the account has never saved one.
    ///
    /// A stored value that does not parse as a URL is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the account document cannot be
    /// fetched.
    pub async fn photo_url(&self, account: &AccountId) -> Result<Option<Url>, StoreError> {
        let Some(document) = self.docs.get(account).await? else {
            return Ok(None);
        };
        let Some(raw) = document.get(TRY_ON_PHOTO_FIELD).and_then(Value::as_str) else {
            return Ok(None);
        };

        match Url::parse(raw) {
            Ok(url) => Ok(Some(url)),
            Err(e) => {
                warn!(account = %account, error = %e, "ignoring unparseable saved photo URL");
                Ok(None)
            }
        }
    }

    /// Overwrite the saved photo URL.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the write is rejected.
    pub async fn set_photo_url(&self, account: &AccountId, url: &Url) -> Result<(), StoreError> {
        self.docs
            .set_field(account, TRY_ON_PHOTO_FIELD, Value::String(url.to_string()))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use crate::store::memory::MemoryDocumentStore;

    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let docs = MemoryDocumentStore::new();
        let profile = TryOnProfile::new(docs.clone());
        let account = AccountId::new("uid-1");

        assert_eq!(profile.photo_url(&account).await.unwrap(), None);

        let url = Url::parse("https://blobs.example/u/uid-1/tryon.jpg").unwrap();
        profile.set_photo_url(&account, &url).await.unwrap();
        assert_eq!(profile.photo_url(&account).await.unwrap(), Some(url));
    }

    #[tokio::test]
    async fn test_garbage_value_reads_as_absent() {
        let docs = MemoryDocumentStore::new();
        let account = AccountId::new("uid-1");
        docs.seed(account.clone(), json!({ "tryOnPhotoUrl": "not a url" }));

        let profile = TryOnProfile::new(docs);
        assert_eq!(profile.photo_url(&account).await.unwrap(), None);
    }
}
