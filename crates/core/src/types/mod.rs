//! Core types for ShopStore.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod product;
pub mod user;

pub use cart::{Cart, CartLine};
pub use id::*;
pub use product::{Product, Rating};
pub use user::{Session, UserProfile};
