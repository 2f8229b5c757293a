//! Remote product catalog client and the pure filter engine.
//!
//! # Architecture
//!
//! - The catalog service is the source of truth - no local sync, direct
//!   API calls over `reqwest`
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//! - Filtering/search/sort happens locally over the full list, in
//!   [`filter`]
//!
//! # Example
//!
//! ```rust,ignore
//! use shopstore_storefront::catalog::CatalogClient;
//!
//! let catalog = CatalogClient::new(&config.catalog_api_url);
//! let products = catalog.list_products().await?;
//! let product = catalog.get_product(ProductId::new(1)).await?;
//! ```

pub mod filter;

pub use filter::{CategoryFilter, FilterSpec, SortKey};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use shopstore_core::{Product, ProductId};

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (transport-level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog returned a non-success status.
    #[error("catalog returned status {0}")]
    Status(reqwest::StatusCode),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product not found.
    #[error("not found: product {0}")]
    NotFound(ProductId),
}

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Arc<Product>),
}

/// Client for the remote product catalog API.
///
/// Responses are cached for 5 minutes. Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client for the given base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the request fails or the response does
    /// not parse. A failure leaves the previous cache entry (if any) intact.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        const KEY: &str = "products";

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(KEY).await {
            debug!("catalog cache hit for product list");
            return Ok(products);
        }

        let url = format!("{}/products", self.inner.base_url);
        let body = self.fetch(&url).await?;
        let products: Arc<Vec<Product>> = Arc::new(serde_json::from_str(&body)?);

        self.inner
            .cache
            .insert(KEY.to_string(), CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the catalog has no such
    /// product, other [`CatalogError`] variants on transport failures.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Arc<Product>, CatalogError> {
        let key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("catalog cache hit for product {id}");
            return Ok(product);
        }

        let url = format!("{}/products/{id}", self.inner.base_url);
        let body = match self.fetch(&url).await {
            Ok(body) => body,
            Err(CatalogError::Status(status)) if status == reqwest::StatusCode::NOT_FOUND => {
                return Err(CatalogError::NotFound(id));
            }
            Err(e) => return Err(e),
        };

        // The demo catalog answers an unknown ID with an empty 200 body
        // rather than a 404; treat both as not found.
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(CatalogError::NotFound(id));
        }

        let product: Arc<Product> = Arc::new(serde_json::from_str(trimmed)?);
        self.inner
            .cache
            .insert(key, CacheValue::Product(product.clone()))
            .await;
        Ok(product)
    }

    async fn fetch(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            // Callers know which resource was requested and map this.
            return Err(CatalogError::Status(status));
        }
        if !status.is_success() {
            tracing::error!(status = %status, url, "catalog returned non-success status");
            return Err(CatalogError::Status(status));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "not found: product 123");

        let err = CatalogError::Status(reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "catalog returned status 502 Bad Gateway");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("https://catalog.example.com/");
        assert_eq!(client.inner.base_url, "https://catalog.example.com");
    }
}
