//! Atelier Core - Shared types library.
//!
//! This crate provides common types used across all Atelier components:
//! - `sync` - Cart/wishlist synchronization engine
//! - `cli` - Command-line demo driving the engine against local files
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no stores, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, identity, cart lines, wishlist entries, and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
