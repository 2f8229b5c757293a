//! Product route handlers.
//!
//! The listing endpoint fetches the full catalog (cached) and derives the
//! display list through the pure filter engine; the filter spec is rebuilt
//! from the query string on every request.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use shopstore_core::{Product, ProductId};

use crate::catalog::{self, CategoryFilter, FilterSpec, SortKey};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Category name, or `all`.
    pub category: Option<String>,
    /// Free-text search term.
    pub q: Option<String>,
    /// Inclusive lower price bound, as a decimal string.
    pub min_price: Option<String>,
    /// Inclusive upper price bound, as a decimal string.
    pub max_price: Option<String>,
    /// Sort key: `default`, `price-ascending`, `price-descending`,
    /// `name-ascending`.
    pub sort: Option<String>,
}

impl ProductListQuery {
    fn into_filter_spec(self) -> Result<FilterSpec> {
        let defaults = FilterSpec::default();

        let sort = match self.sort.as_deref() {
            None | Some("") => SortKey::Default,
            Some(value) => SortKey::parse(value)
                .ok_or_else(|| AppError::BadRequest(format!("unknown sort key '{value}'")))?,
        };

        let min = match self.min_price.as_deref() {
            Some(value) => parse_price_bound("min_price", value)?,
            None => defaults.price_range.0,
        };
        let max = match self.max_price.as_deref() {
            Some(value) => parse_price_bound("max_price", value)?,
            None => defaults.price_range.1,
        };

        Ok(FilterSpec {
            category: CategoryFilter::parse(self.category.as_deref()),
            search_term: self.q.unwrap_or_default(),
            price_range: (min, max),
            sort,
        })
    }
}

// Bounds are parsed from the raw query string so exact decimals never pass
// through a float.
fn parse_price_bound(name: &str, value: &str) -> Result<Decimal> {
    value
        .parse::<Decimal>()
        .map_err(|e| AppError::BadRequest(format!("invalid {name}: {e}")))
}

/// List products matching the query's filter spec.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>> {
    let spec = query.into_filter_spec()?;
    let products = state.catalog().list_products().await?;
    Ok(Json(catalog::filter::filter(&products, &spec)))
}

/// List distinct categories in first-seen order.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let products = state.catalog().list_products().await?;
    Ok(Json(catalog::filter::categories(&products)))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = state.catalog().get_product(ProductId::new(id)).await?;
    Ok(Json((*product).clone()))
}
