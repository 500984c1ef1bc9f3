//! Atelier Sync - the cart/wishlist synchronization engine.
//!
//! Keeps a shopping cart and a wishlist consistent across two storage
//! domains: an anonymous device-local store used before sign-in, and an
//! authoritative per-account document store used after sign-in. Guest
//! state is reconciled into account state exactly once at the sign-in
//! boundary; mutations apply to in-memory state synchronously and persist
//! asynchronously.
//!
//! # Architecture
//!
//! - [`collection`] - ordered keyed collections and the merge policies
//! - [`store`] - collaborator traits ([`LocalStore`], [`DocumentStore`])
//!   plus memory- and file-backed implementations
//! - [`auth`] - identity source ([`AuthProvider`], [`AuthBroker`])
//! - [`cart`] / [`wishlist`] - the two sync controllers
//! - [`orders`] - order submission over an [`OrderGateway`]
//! - [`profile`] - the saved try-on photo handle on the account document
//! - [`ai`] - client for the external generation service (try-on, copy)
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_sync::{AuthBroker, CartSync, MemoryDocumentStore, MemoryLocalStore};
//!
//! let auth = AuthBroker::new(Identity::Anonymous);
//! let cart = CartSync::new(MemoryDocumentStore::new(), MemoryLocalStore::new());
//! cart.apply_identity(auth.identity()).await?;
//!
//! cart.add(&product, "M", 1).await?;         // guest cart, device-local
//! auth.sign_in(AccountId::new("uid-1"));     // merge runs on the next
//! cart.apply_identity(auth.identity()).await?; // observed transition
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod ai;
pub mod auth;
pub mod binding;
pub mod cart;
pub mod collection;
pub mod error;
pub mod orders;
pub mod profile;
pub mod store;
pub mod wishlist;

pub use auth::{AuthBroker, AuthProvider};
pub use binding::SyncEntity;
pub use cart::CartSync;
pub use collection::{EntityCollection, Record};
pub use error::{Receipt, SyncError, Toggle};
pub use orders::{OrderError, OrderGateway, OrderService};
pub use profile::TryOnProfile;
pub use store::file::{FileDocumentStore, FileOrderGateway, JsonFileStore, OrderRecord};
pub use store::memory::{MemoryDocumentStore, MemoryLocalStore, MemoryOrderGateway};
pub use store::{DocumentStore, LocalStore, StoreError};
pub use wishlist::WishlistSync;
