//! ShopStore Core - Shared types library.
//!
//! This crate provides common types used across all ShopStore components:
//! - `storefront` - Public-facing storefront service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, catalog products, cart lines, and sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
