//! Controller-layer integration tests.
//!
//! The upstream catalog and auth APIs are replaced by local fixture servers
//! bound to ephemeral ports; the storefront router is driven directly with
//! `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use shopstore_storefront::config::{AuthBackendConfig, StorefrontConfig};
use shopstore_storefront::routes;
use shopstore_storefront::state::AppState;
use shopstore_storefront::storage::{KvStore, MemoryStore};

// =============================================================================
// Fixture upstream
// =============================================================================

fn fixture_products() -> Value {
    json!([
        {
            "id": 1,
            "title": "Red Shoe",
            "price": 10,
            "description": "A sturdy red shoe",
            "category": "a",
            "image": "https://example.com/1.jpg",
            "rating": { "rate": 4.1, "count": 10 }
        },
        {
            "id": 2,
            "title": "Blue Hat",
            "price": 20,
            "description": "A wide-brimmed blue hat",
            "category": "b",
            "image": "https://example.com/2.jpg"
        },
        {
            "id": 3,
            "title": "Green Sock",
            "price": 7.5,
            "description": "One green sock",
            "category": "a",
            "image": "https://example.com/3.jpg"
        }
    ])
}

fn fixture_directory_users() -> Value {
    json!([
        {
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "phone": "1-770-736-8031",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona" }
        },
        {
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv"
        }
    ])
}

async fn fixture_product(Path(id): Path<usize>) -> Response {
    match fixture_products().get(id.wrapping_sub(1)) {
        Some(product) => Json(product.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn fixture_token_login(Json(body): Json<Value>) -> Response {
    if body["username"] == "johnd" && body["password"] == "m38rmF$" {
        Json(json!({ "token": "fixture-token" })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn fixture_token_user() -> Json<Value> {
    Json(json!({
        "id": 1,
        "email": "john@gmail.com",
        "username": "johnd",
        "name": { "firstname": "john", "lastname": "doe" },
        "phone": "1-570-236-7033"
    }))
}

/// Serve the fixture upstream on an ephemeral port, returning its base URL.
async fn spawn_fixture() -> String {
    let app = Router::new()
        .route("/products", get(|| async { Json(fixture_products()) }))
        .route("/products/{id}", get(fixture_product))
        .route("/users", get(|| async { Json(fixture_directory_users()) }))
        .route("/users/{id}", get(fixture_token_user))
        .route("/auth/login", post(fixture_token_login));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

// =============================================================================
// App under test
// =============================================================================

fn test_config(base_url: &str, auth: AuthBackendConfig) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        state_dir: PathBuf::from("unused"),
        catalog_api_url: base_url.to_string(),
        auth,
        tax_rate: "0.08".parse().unwrap(),
        sentry_dsn: None,
    }
}

fn directory_backend(base_url: &str) -> AuthBackendConfig {
    AuthBackendConfig::Directory {
        base_url: base_url.to_string(),
        shared_password: SecretString::from("plutonic123"),
    }
}

async fn directory_app() -> Router {
    let base = spawn_fixture().await;
    let config = test_config(&base, directory_backend(&base));
    app_with(config)
}

fn app_with(config: StorefrontConfig) -> Router {
    let storage: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let state = AppState::with_storage(config, storage);
    Router::new().merge(routes::routes()).with_state(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}

fn approx(value: &Value, expected: f64) -> bool {
    (value.as_f64().unwrap() - expected).abs() < 1e-9
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn products_listing_returns_catalog_order() {
    let app = directory_app().await;
    let (status, body) = get_json(&app, "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);
}

#[tokio::test]
async fn products_listing_applies_filters_from_query() {
    let app = directory_app().await;

    let (_, body) = get_json(&app, "/products?category=a").await;
    assert_eq!(ids(&body), vec![1, 3]);

    let (_, body) = get_json(&app, "/products?q=hat").await;
    assert_eq!(ids(&body), vec![2]);

    let (_, body) = get_json(&app, "/products?min_price=15&max_price=25").await;
    assert_eq!(ids(&body), vec![2]);

    let (_, body) = get_json(&app, "/products?sort=price-descending").await;
    assert_eq!(ids(&body), vec![2, 1, 3]);
}

#[tokio::test]
async fn products_listing_rejects_unknown_sort_key() {
    let app = directory_app().await;
    let (status, body) = get_json(&app, "/products?sort=rating").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sort"));
}

#[tokio::test]
async fn products_categories_in_first_seen_order() {
    let app = directory_app().await;
    let (status, body) = get_json(&app, "/products/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["a", "b"]));
}

#[tokio::test]
async fn product_detail_found_and_not_found() {
    let app = directory_app().await;

    let (status, body) = get_json(&app, "/products/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Blue Hat");

    let (status, _) = get_json(&app, "/products/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn cart_add_merges_lines_and_derives_totals() {
    let app = directory_app().await;

    let (status, _) = post_json(&app, "/cart/add", json!({ "product_id": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = post_json(&app, "/cart/add", json!({ "product_id": 1 })).await;

    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["total_items"], 2);

    // price 10 x 2 -> subtotal 20, tax 1.60, grand total 21.60
    assert!(approx(&body["subtotal"], 20.0));
    assert!(approx(&body["tax"], 1.6));
    assert!(approx(&body["grand_total"], 21.6));

    let (_, count) = get_json(&app, "/cart/count").await;
    assert_eq!(count["count"], 2);
}

#[tokio::test]
async fn cart_add_unknown_product_is_404_and_leaves_cart_alone() {
    let app = directory_app().await;

    let (status, _) = post_json(&app, "/cart/add", json!({ "product_id": 99 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get_json(&app, "/cart").await;
    assert_eq!(body["total_items"], 0);
}

#[tokio::test]
async fn cart_update_remove_clear_flow() {
    let app = directory_app().await;

    post_json(&app, "/cart/add", json!({ "product_id": 1, "quantity": 2 })).await;
    post_json(&app, "/cart/add", json!({ "product_id": 2 })).await;

    let (_, body) = post_json(
        &app,
        "/cart/update",
        json!({ "product_id": 1, "quantity": 5 }),
    )
    .await;
    assert_eq!(body["total_items"], 6);

    // Quantity below 1 is a no-op, not a removal.
    let (_, body) = post_json(
        &app,
        "/cart/update",
        json!({ "product_id": 1, "quantity": 0 }),
    )
    .await;
    assert_eq!(body["total_items"], 6);

    let (_, body) = post_json(&app, "/cart/remove", json!({ "product_id": 1 })).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product"]["id"], 2);

    let (_, body) = post_empty(&app, "/cart/clear").await;
    assert_eq!(body["total_items"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn directory_login_succeeds_with_shared_password() {
    let app = directory_app().await;

    let (status, body) = post_json(
        &app,
        "/auth/login",
        json!({ "username": "Bret", "password": "plutonic123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["user"]["username"], "Bret");
    assert_eq!(body["session"]["user"]["company"], "Romaguera-Crona");
    assert!(
        body["session"]["token"]
            .as_str()
            .unwrap()
            .starts_with("token_1_")
    );
}

#[tokio::test]
async fn directory_login_accepts_email_identifier() {
    let app = directory_app().await;

    let (status, body) = post_json(
        &app,
        "/auth/login",
        json!({ "username": "shanna@melissa.tv", "password": "plutonic123" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["user"]["username"], "Antonette");
}

#[tokio::test]
async fn directory_login_distinguishes_unknown_user_from_bad_password() {
    let app = directory_app().await;

    let (status, body) = post_json(
        &app,
        "/auth/login",
        json!({ "username": "nobody", "password": "plutonic123" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("User not found"));

    let (status, body) = post_json(
        &app,
        "/auth/login",
        json!({ "username": "Bret", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("Invalid password"));
}

#[tokio::test]
async fn login_validates_fields_before_any_network_call() {
    let app = directory_app().await;

    let (status, body) = post_json(&app, "/auth/login", json!({ "username": "Bret" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("password"));

    let (status, _) = post_json(&app, "/auth/login", json!({ "password": "x" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_backend_login_issues_token_and_fetches_profile() {
    let base = spawn_fixture().await;
    let config = test_config(
        &base,
        AuthBackendConfig::TokenIssuing {
            base_url: base.clone(),
        },
    );
    let app = app_with(config);

    let (status, body) = post_json(
        &app,
        "/auth/login",
        json!({ "username": "johnd", "password": "m38rmF$" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["token"], "fixture-token");
    assert_eq!(body["session"]["user"]["name"], "john doe");

    let (status, _) = post_json(
        &app,
        "/auth/login",
        json!({ "username": "johnd", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_session_and_cart() {
    let app = directory_app().await;

    post_json(
        &app,
        "/auth/login",
        json!({ "username": "Bret", "password": "plutonic123" }),
    )
    .await;
    post_json(&app, "/cart/add", json!({ "product_id": 1 })).await;

    let (_, body) = get_json(&app, "/auth/session").await;
    assert!(!body["session"].is_null());

    let (status, body) = post_empty(&app, "/auth/logout").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["session"].is_null());

    let (_, body) = get_json(&app, "/auth/session").await;
    assert!(body["session"].is_null());

    let (_, count) = get_json(&app, "/cart/count").await;
    assert_eq!(count["count"], 0);
}
