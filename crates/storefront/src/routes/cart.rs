//! Cart route handlers.
//!
//! Mutations return the fresh cart snapshot so the UI can re-render without
//! a second fetch. Add-to-cart resolves the product through the catalog
//! client first; an unknown product is a 404, not a phantom cart line.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use shopstore_core::{Cart, Product, ProductId};

use crate::error::Result;
use crate::state::AppState;

/// One line of the cart response.
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Cart snapshot with derived totals.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_items: u64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

impl CartResponse {
    fn from_cart(cart: &Cart, tax_rate: Decimal) -> Self {
        Self {
            items: cart
                .lines
                .iter()
                .map(|line| CartItemResponse {
                    product: line.product.clone(),
                    quantity: line.quantity,
                    line_total: line.line_total(),
                })
                .collect(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
            tax: cart.tax(tax_rate),
            grand_total: cart.grand_total(tax_rate),
        }
    }
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCountResponse {
    pub count: u64,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<i64>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

fn snapshot_response(state: &AppState) -> Json<CartResponse> {
    let cart = state.cart().snapshot();
    Json(CartResponse::from_cart(&cart, state.config().tax_rate))
}

/// Current cart snapshot with totals.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartResponse> {
    snapshot_response(&state)
}

/// Cart badge count.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> Json<CartCountResponse> {
    Json(CartCountResponse {
        count: state.cart().total_items(),
    })
}

/// Add an item to the cart.
///
/// Resolves the product via the catalog client; quantities below 1 are
/// clamped to 1 by the store.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartResponse>> {
    let product = state.catalog().get_product(form.product_id).await?;
    state
        .cart()
        .add_item((*product).clone(), form.quantity.unwrap_or(1));
    Ok(snapshot_response(&state))
}

/// Set the quantity of a line. Quantities below 1 and unknown products are
/// no-ops (removal is its own operation).
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(form): Json<UpdateCartForm>,
) -> Json<CartResponse> {
    state.cart().set_quantity(form.product_id, form.quantity);
    snapshot_response(&state)
}

/// Remove a line from the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(form): Json<RemoveFromCartForm>,
) -> Json<CartResponse> {
    state.cart().remove_item(form.product_id);
    snapshot_response(&state)
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartResponse> {
    state.cart().clear();
    snapshot_response(&state)
}
