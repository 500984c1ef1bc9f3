//! Core types for Atelier.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod identity;
pub mod line;
pub mod order;

pub use email::{Email, EmailError};
pub use id::*;
pub use identity::Identity;
pub use line::{CartLine, LineKey, Product, WishlistEntry};
pub use order::{Customer, OrderDraft, OrderStatus, PaymentMethod};
