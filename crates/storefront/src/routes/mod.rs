//! HTTP route handlers for the storefront JSON surface.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check (registered in main)
//!
//! # Products
//! GET  /products               - Product listing (filter/search/sort via query)
//! GET  /products/categories    - Distinct categories, first-seen order
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart snapshot with totals
//! GET  /cart/count             - Cart badge count
//! POST /cart/add               - Add item (resolves the product first)
//! POST /cart/update            - Set line quantity
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty the cart
//!
//! # Auth
//! POST /auth/login             - Login against the configured backend
//! POST /auth/logout            - Logout (also clears the cart)
//! GET  /auth/session           - Current session
//! ```

pub mod auth;
pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/categories", get(products::categories))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
}
