//! Cart lines, wishlist entries, and the product summary that feeds them.
//!
//! These are the persisted shapes: a cart is a JSON array of
//! [`CartLine`] objects, a wishlist a JSON array of product-id strings.
//! Money is `rust_decimal::Decimal` serialized as a JSON number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// The composite identity of a cart line.
///
/// A collection holds at most one line per `(product_id, size)` pair;
/// adding the same product in the same size again sums quantities instead
/// of creating a second line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
}

impl LineKey {
    /// Create a line key.
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
        }
    }
}

/// One line of a shopping cart.
///
/// `quantity` is always positive: a line whose quantity would drop to
/// zero or below is removed from its collection instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub size: String,
    pub quantity: u32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartLine {
    /// Build a line from a product summary.
    #[must_use]
    pub fn from_product(product: &Product, size: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            size: size.into(),
            quantity,
            name: product.name.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_owned),
        }
    }

    /// The composite key identifying this line.
    #[must_use]
    pub fn line_key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.size.clone())
    }

    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Wishlist membership for a single product.
///
/// The wishlist is a set: a product appears at most once, and an entry
/// carries no payload beyond the product ID. Serialized as a bare string
/// so a persisted wishlist is a plain array of product IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistEntry {
    pub product_id: ProductId,
}

impl WishlistEntry {
    /// Create an entry for a product.
    #[must_use]
    pub fn new(product_id: ProductId) -> Self {
        Self { product_id }
    }
}

/// The product data UI surfaces hand to the engine when mutating.
///
/// This is a summary of whatever catalog record the caller is holding,
/// not a catalog type of its own; the engine copies what it needs onto
/// cart lines and order snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Product {
    /// The first listed image, used as the cart-line thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn product() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Cargo Shorts".to_owned(),
            price: price("19.99"),
            images: vec!["https://img.example/p1.jpg".to_owned()],
        }
    }

    #[test]
    fn test_from_product_copies_summary() {
        let line = CartLine::from_product(&product(), "M", 2);
        assert_eq!(line.product_id, ProductId::new("p1"));
        assert_eq!(line.size, "M");
        assert_eq!(line.quantity, 2);
        assert_eq!(line.image.as_deref(), Some("https://img.example/p1.jpg"));
        assert_eq!(line.subtotal(), price("39.98"));
    }

    #[test]
    fn test_persisted_shape_is_camel_case_with_numeric_price() {
        let line = CartLine::from_product(&product(), "M", 1);
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productId": "p1",
                "size": "M",
                "quantity": 1,
                "name": "Cargo Shorts",
                "price": 19.99,
                "image": "https://img.example/p1.jpg",
            })
        );
    }

    #[test]
    fn test_wishlist_entry_is_a_bare_string() {
        let entry = WishlistEntry::new(ProductId::new("p1"));
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            "\"p1\"".to_owned()
        );
    }

    #[test]
    fn test_line_without_image_omits_field() {
        let mut line = CartLine::from_product(&product(), "M", 1);
        line.image = None;
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("image").is_none());
    }
}
