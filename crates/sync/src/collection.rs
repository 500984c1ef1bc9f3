//! Ordered keyed collections and the per-entity merge policies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use atelier_core::{CartLine, LineKey, ProductId, WishlistEntry};

/// A record stored in an [`EntityCollection`].
///
/// `key` is the record's composite identity; a collection holds at most
/// one record per key. `absorb` is the merge policy applied when an
/// incoming record meets an existing one with the same key.
pub trait Record: Clone {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;

    /// Fold an incoming record with the same key into this one.
    fn absorb(&mut self, incoming: Self);
}

impl Record for CartLine {
    type Key = LineKey;

    fn key(&self) -> LineKey {
        self.line_key()
    }

    // Same (product, size) in both carts: quantities sum.
    fn absorb(&mut self, incoming: Self) {
        self.quantity += incoming.quantity;
    }
}

impl Record for WishlistEntry {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product_id.clone()
    }

    // Membership only; the existing entry stands, making merge a set union.
    fn absorb(&mut self, _incoming: Self) {}
}

/// An ordered list of records with at-most-one-per-key semantics.
///
/// Existing records keep their position; new records append. This is the
/// in-memory observable state of a cart or wishlist and also its
/// persisted shape (serialized as a bare array).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCollection<T> {
    items: Vec<T>,
}

impl<T> Default for EntityCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> EntityCollection<T> {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing list, keeping its order.
    #[must_use]
    pub fn from_items(items: Vec<T>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The record with the given key, if any.
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == *key)
    }

    #[must_use]
    pub fn contains(&self, key: &T::Key) -> bool {
        self.get(key).is_some()
    }

    /// Replace the record with `key` by `producer(Some(existing))`, or
    /// append `producer(None)` when no record matches.
    ///
    /// Keyed, not indexed: existing records keep their position, new
    /// records go to the end.
    pub fn upsert(&mut self, key: &T::Key, producer: impl FnOnce(Option<&T>) -> T) {
        match self.items.iter().position(|item| item.key() == *key) {
            Some(index) => {
                let replacement = producer(self.items.get(index));
                if let Some(slot) = self.items.get_mut(index) {
                    *slot = replacement;
                }
            }
            None => self.items.push(producer(None)),
        }
    }

    /// Insert a record, absorbing it into an existing one with the same key.
    pub fn insert(&mut self, record: T) {
        let key = record.key();
        match self.items.iter_mut().find(|item| item.key() == key) {
            Some(existing) => existing.absorb(record),
            None => self.items.push(record),
        }
    }

    /// Remove every record matching the predicate, returning the removed
    /// records in their original order.
    pub fn remove_if(&mut self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut removed = Vec::new();
        self.items.retain(|item| {
            if predicate(item) {
                removed.push(item.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Merge `incoming` into `base`.
    ///
    /// Pure and deterministic: incoming records whose key matches a base
    /// record are absorbed (cart lines sum quantities, wishlist entries
    /// dedupe); the rest append after all base records, keeping their
    /// original relative order.
    ///
    /// Not idempotent: merging the same incoming collection twice absorbs
    /// it twice (a cart would double its quantities). Callers own
    /// draining the incoming side after a merge; the sign-in transition
    /// does so by deleting the guest copy before persisting the result.
    #[must_use]
    pub fn merged(base: Self, incoming: Self) -> Self {
        let mut merged = base;
        for record in incoming.items {
            merged.insert(record);
        }
        merged
    }
}

impl<T: Record + Serialize + DeserializeOwned> EntityCollection<T> {
    /// Deserialize a collection from a stored JSON array.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the value is not an array
    /// of records.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serialize the collection to its stored JSON array shape.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error (collections of plain data
    /// records do not fail in practice).
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<T> IntoIterator for EntityCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::Product;
    use rust_decimal::Decimal;

    use super::*;

    fn line(id: &str, size: &str, quantity: u32) -> CartLine {
        let product = Product {
            id: ProductId::new(id),
            name: id.to_owned(),
            price: Decimal::ONE,
            images: Vec::new(),
        };
        CartLine::from_product(&product, size, quantity)
    }

    #[test]
    fn test_upsert_preserves_order_and_appends() {
        let mut cart = EntityCollection::new();
        cart.insert(line("p1", "M", 1));
        cart.insert(line("p2", "L", 1));
        cart.insert(line("p1", "M", 2));

        let quantities: Vec<(String, u32)> = cart
            .items()
            .iter()
            .map(|l| (l.product_id.to_string(), l.quantity))
            .collect();
        assert_eq!(
            quantities,
            vec![("p1".to_owned(), 3), ("p2".to_owned(), 1)]
        );
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut cart = EntityCollection::new();
        cart.insert(line("p1", "M", 1));
        let key = LineKey::new(ProductId::new("p1"), "M");
        cart.upsert(&key, |existing| {
            let mut updated = existing.cloned().unwrap_or_else(|| line("p1", "M", 0));
            updated.quantity = 7;
            updated
        });
        assert_eq!(cart.get(&key).unwrap().quantity, 7);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_if_returns_removed() {
        let mut cart = EntityCollection::new();
        cart.insert(line("p1", "M", 1));
        cart.insert(line("p2", "L", 1));

        let removed = cart.remove_if(|l| l.product_id.as_str() == "p1");
        assert_eq!(removed.len(), 1);
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(&LineKey::new(ProductId::new("p1"), "M")));
    }

    #[test]
    fn test_cart_merge_sums_matching_and_appends_rest() {
        let account = EntityCollection::from_items(vec![line("p1", "M", 2)]);
        let guest = EntityCollection::from_items(vec![line("p1", "M", 3), line("p2", "L", 1)]);

        let merged = EntityCollection::merged(account, guest);

        let summary: Vec<(String, String, u32)> = merged
            .items()
            .iter()
            .map(|l| (l.product_id.to_string(), l.size.clone(), l.quantity))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("p1".to_owned(), "M".to_owned(), 5),
                ("p2".to_owned(), "L".to_owned(), 1),
            ]
        );
    }

    #[test]
    fn test_cart_merge_is_not_idempotent_by_design() {
        let account = EntityCollection::from_items(vec![line("p1", "M", 2)]);
        let guest = EntityCollection::from_items(vec![line("p1", "M", 3)]);

        let once = EntityCollection::merged(account, guest.clone());
        let twice = EntityCollection::merged(once, guest);

        // Re-applying an undrained guest cart double-counts; the sign-in
        // transition prevents this by deleting the guest copy first.
        assert_eq!(twice.items().first().unwrap().quantity, 8);
    }

    #[test]
    fn test_wishlist_merge_is_set_union() {
        let account = EntityCollection::from_items(vec![
            WishlistEntry::new(ProductId::new("p1")),
            WishlistEntry::new(ProductId::new("p2")),
        ]);
        let guest = EntityCollection::from_items(vec![
            WishlistEntry::new(ProductId::new("p2")),
            WishlistEntry::new(ProductId::new("p3")),
        ]);

        let merged = EntityCollection::merged(account, guest);
        let ids: Vec<&str> = merged
            .items()
            .iter()
            .map(|e| e.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_value_roundtrip_is_a_bare_array() {
        let cart = EntityCollection::from_items(vec![line("p1", "M", 1)]);
        let value = cart.to_value().unwrap();
        assert!(value.is_array());

        let back = EntityCollection::<CartLine>::from_value(value).unwrap();
        assert_eq!(back, cart);
    }
}
