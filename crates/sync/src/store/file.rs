//! Single-file JSON storage backends.
//!
//! The CLI's stand-ins for a browser's local storage and a hosted
//! document store: one JSON file per concern, rewritten wholesale on
//! every change. Good enough for a demo on one machine; the
//! last-writer-wins caveat on [`super::DocumentStore`] applies here too.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use atelier_core::{AccountId, OrderDraft, OrderId};

use crate::orders::OrderGateway;

use super::{DocumentStore, LocalStore, StoreError};

fn read_object(path: &Path) -> Result<Map<String, Value>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
        Err(e) => Err(e.into()),
    }
}

fn write_object(path: &Path, object: &Map<String, Value>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_vec_pretty(object)?)?;
    Ok(())
}

/// [`LocalStore`] backed by one JSON object file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocalStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(read_object(&self.path)?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut object = read_object(&self.path)?;
        object.insert(key.to_owned(), value.clone());
        write_object(&self.path, &object)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut object = read_object(&self.path)?;
        if object.remove(key).is_some() {
            write_object(&self.path, &object)?;
        }
        Ok(())
    }
}

/// [`DocumentStore`] backed by one JSON file keyed by account ID.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, documents: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(documents)?).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, account: &AccountId) -> Result<Option<Value>, StoreError> {
        Ok(self.load().await?.get(account.as_str()).cloned())
    }

    async fn set_field(
        &self,
        account: &AccountId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.load().await?;
        let document = documents
            .entry(account.as_str().to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        match document.as_object_mut() {
            Some(fields) => {
                fields.insert(field.to_owned(), value);
            }
            None => {
                return Err(StoreError::Backend(format!(
                    "document for {account} is not an object"
                )));
            }
        }
        self.save(&documents).await
    }
}

/// A submitted order as stored by [`FileOrderGateway`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    #[serde(flatten)]
    pub draft: OrderDraft,
}

/// [`OrderGateway`] appending to a JSON array file.
#[derive(Debug, Clone)]
pub struct FileOrderGateway {
    path: PathBuf,
}

impl FileOrderGateway {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All submitted orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the file cannot be read or decoded.
    pub async fn all(&self) -> Result<Vec<OrderRecord>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl OrderGateway for FileOrderGateway {
    async fn submit(&self, draft: &OrderDraft) -> Result<OrderId, StoreError> {
        let mut orders = self.all().await?;
        let id = OrderId::new(Uuid::new_v4().to_string());
        orders.push(OrderRecord {
            id: id.clone(),
            draft: draft.clone(),
        });

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&orders)?).await?;
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("local.json"));

        assert_eq!(store.read("guest_cart").unwrap(), None);
        store.write("guest_cart", &json!([{"productId": "p1"}])).unwrap();
        assert_eq!(
            store.read("guest_cart").unwrap(),
            Some(json!([{"productId": "p1"}]))
        );

        store.delete("guest_cart").unwrap();
        assert_eq!(store.read("guest_cart").unwrap(), None);
    }

    #[test]
    fn test_json_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        JsonFileStore::new(&path).write("k", &json!(1)).unwrap();
        assert_eq!(JsonFileStore::new(&path).read("k").unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_document_store_field_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("documents.json"));
        let account = AccountId::new("uid-1");

        store.set_field(&account, "cart", json!([1])).await.unwrap();
        store.set_field(&account, "cart", json!([2])).await.unwrap();
        store
            .set_field(&account, "wishlist", json!(["p1"]))
            .await
            .unwrap();

        let doc = store.get(&account).await.unwrap().unwrap();
        assert_eq!(doc["cart"], json!([2]));
        assert_eq!(doc["wishlist"], json!(["p1"]));
    }
}
