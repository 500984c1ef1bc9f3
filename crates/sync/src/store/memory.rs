//! In-memory storage backends.
//!
//! Cheaply cloneable handles over shared maps, used as test fakes and as
//! the zero-setup backend for demos. Handles cloned from the same store
//! observe the same data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use atelier_core::{AccountId, OrderDraft, OrderId};

use crate::orders::OrderGateway;

use super::{DocumentStore, LocalStore, StoreError};

/// In-memory [`LocalStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    entries: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryLocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("local store lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStore for MemoryLocalStore {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .entries
            .lock()
            .expect("local store lock poisoned")
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("local store lock poisoned")
            .insert(key.to_owned(), value.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("local store lock poisoned")
            .remove(key);
        Ok(())
    }
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<Mutex<HashMap<AccountId, Value>>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account document, replacing any existing one.
    pub fn seed(&self, account: AccountId, document: Value) {
        self.documents
            .lock()
            .expect("document store lock poisoned")
            .insert(account, document);
    }

    /// Snapshot of one field of an account document, for assertions.
    #[must_use]
    pub fn field(&self, account: &AccountId, field: &str) -> Option<Value> {
        self.documents
            .lock()
            .expect("document store lock poisoned")
            .get(account)
            .and_then(|doc| doc.get(field).cloned())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, account: &AccountId) -> Result<Option<Value>, StoreError> {
        Ok(self
            .documents
            .lock()
            .expect("document store lock poisoned")
            .get(account)
            .cloned())
    }

    async fn set_field(
        &self,
        account: &AccountId,
        field: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().expect("document store lock poisoned");
        let document = documents
            .entry(account.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        match document.as_object_mut() {
            Some(fields) => {
                fields.insert(field.to_owned(), value);
                Ok(())
            }
            None => Err(StoreError::Backend(format!(
                "document for {account} is not an object"
            ))),
        }
    }
}

/// In-memory order sink assigning random v4 IDs.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderGateway {
    orders: Arc<Mutex<Vec<(OrderId, OrderDraft)>>>,
}

impl MemoryOrderGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All submitted orders, in submission order.
    #[must_use]
    pub fn submitted(&self) -> Vec<(OrderId, OrderDraft)> {
        self.orders.lock().expect("order gateway lock poisoned").clone()
    }
}

#[async_trait]
impl OrderGateway for MemoryOrderGateway {
    async fn submit(&self, draft: &OrderDraft) -> Result<OrderId, StoreError> {
        let id = OrderId::new(Uuid::new_v4().to_string());
        self.orders
            .lock()
            .expect("order gateway lock poisoned")
            .push((id.clone(), draft.clone()));
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_local_roundtrip_and_delete() {
        let store = MemoryLocalStore::new();
        assert_eq!(store.read("guest_cart").unwrap(), None);

        store.write("guest_cart", &json!([1, 2])).unwrap();
        assert_eq!(store.read("guest_cart").unwrap(), Some(json!([1, 2])));

        store.delete("guest_cart").unwrap();
        assert_eq!(store.read("guest_cart").unwrap(), None);
        // Deleting again stays quiet.
        store.delete("guest_cart").unwrap();
    }

    #[tokio::test]
    async fn test_set_field_creates_document() {
        let store = MemoryDocumentStore::new();
        let account = AccountId::new("uid-1");
        assert_eq!(store.get(&account).await.unwrap(), None);

        store
            .set_field(&account, "cart", json!([{"productId": "p1"}]))
            .await
            .unwrap();

        let doc = store.get(&account).await.unwrap().unwrap();
        assert_eq!(doc["cart"], json!([{"productId": "p1"}]));
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryLocalStore::new();
        let alias = store.clone();
        alias.write("k", &json!(true)).unwrap();
        assert_eq!(store.read("k").unwrap(), Some(json!(true)));
    }
}
