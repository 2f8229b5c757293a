//! Cart line and cart snapshot types.
//!
//! A cart is an insertion-ordered list of lines, at most one line per
//! product ID. The totals are derived values, never stored: the tax rate is
//! supplied by the caller and does not live in the cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One cart entry: a product snapshot plus its aggregated quantity.
///
/// Invariant: `quantity >= 1`. Lines with a lower quantity are never
/// constructed; the cart store clamps or rejects such requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The product this line refers to, as fetched from the catalog.
    pub product: crate::Product,
    /// Aggregated quantity, always >= 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price x quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// A point-in-time snapshot of the cart, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Total item count: sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of price x quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Tax amount at the given rate.
    #[must_use]
    pub fn tax(&self, rate: Decimal) -> Decimal {
        self.subtotal() * rate
    }

    /// Subtotal plus tax at the given rate.
    #[must_use]
    pub fn grand_total(&self, rate: Decimal) -> Decimal {
        self.subtotal() * (Decimal::ONE + rate)
    }
}
