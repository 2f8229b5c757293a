//! Catalog product types.
//!
//! Products are sourced from the remote catalog API and are read-only: the
//! storefront only ever holds copies for display and cart purposes. The wire
//! shape matches the public demo catalog (`GET /products`), which serializes
//! prices and ratings as JSON numbers; the `serde-float` feature of
//! `rust_decimal` handles that mapping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID assigned by the catalog.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Image URI.
    pub image: String,
    /// Category name (open set, exact-match filtering).
    pub category: String,
    /// Aggregate customer rating, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

/// Aggregate product rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average rating, 0 to 5.
    pub rate: Decimal,
    /// Number of ratings.
    pub count: u64,
}
