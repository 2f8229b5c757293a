//! Cart state store.
//!
//! Holds the insertion-ordered line list and enforces the cart invariants:
//! at most one line per product ID, and every line quantity >= 1. All
//! operations are synchronous and total - they never fail, they clamp or
//! no-op instead.
//!
//! Quantity policy: `add_item` clamps requests below 1 up to 1 (the UI only
//! offers increment controls, so a sub-1 add is always a caller bug worth
//! absorbing). `set_quantity` with a value below 1 is a no-op - removal is
//! an explicit separate operation, never an implicit side effect of a bad
//! quantity.

use std::sync::{PoisonError, RwLock};

use shopstore_core::{Cart, CartLine, Product, ProductId};

/// Store for the shopping cart.
#[derive(Default)]
pub struct CartStore {
    lines: RwLock<Vec<CartLine>>,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `product` to the cart.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line is appended. Quantities below 1 are clamped to 1.
    pub fn add_item(&self, product: Product, quantity: i64) {
        let quantity = u32::try_from(quantity).map_or(1, |q| q.max(1));
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(line) = lines.iter_mut().find(|line| line.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            lines.push(CartLine { product, quantity });
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// No-op when the product is not in the cart or when `quantity < 1`
    /// (a zero or negative quantity must neither create a degenerate line
    /// nor silently remove one).
    pub fn set_quantity(&self, product_id: ProductId, quantity: i64) {
        let Ok(quantity) = u32::try_from(quantity) else {
            return;
        };
        if quantity < 1 {
            return;
        }
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(line) = lines.iter_mut().find(|line| line.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Remove the line for `product_id`, if present.
    pub fn remove_item(&self, product_id: ProductId) {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        lines.retain(|line| line.product.id != product_id);
    }

    /// Empty the cart unconditionally.
    pub fn clear(&self) {
        let mut lines = self.lines.write().unwrap_or_else(PoisonError::into_inner);
        lines.clear();
    }

    /// Snapshot of the cart in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        let lines = self.lines.read().unwrap_or_else(PoisonError::into_inner);
        Cart {
            lines: lines.clone(),
        }
    }

    /// Total item count: sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        let lines = self.lines.read().unwrap_or_else(PoisonError::into_inner);
        lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
