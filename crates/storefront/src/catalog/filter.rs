//! Pure product-list filtering, search, and sort.
//!
//! [`filter`] is input -> output with no hidden state: given the full
//! product list and a [`FilterSpec`] it produces the display list. It never
//! mutates its input and is deterministic for identical inputs. An empty
//! result is a valid outcome, not an error.

use rust_decimal::Decimal;

use shopstore_core::Product;

/// Category selection: everything, or one exact category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a query-string value; `"all"`, empty, or absent means all.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("" | "all") => Self::All,
            Some(category) => Self::Only(category.to_string()),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }
}

/// Sort order for the display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Input order, untouched.
    #[default]
    Default,
    PriceAscending,
    PriceDescending,
    NameAscending,
}

impl SortKey {
    /// Parse a query-string value. Unknown values are rejected so a typo in
    /// the UI surfaces as a 400 rather than silently sorting wrong.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "default" => Some(Self::Default),
            "price-ascending" => Some(Self::PriceAscending),
            "price-descending" => Some(Self::PriceDescending),
            "name-ascending" => Some(Self::NameAscending),
            _ => None,
        }
    }
}

/// The current category/search/price/sort selection.
///
/// Recreated per query from the request; never persisted.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub category: CategoryFilter,
    /// Case-insensitive substring matched against title or description.
    /// Surrounding whitespace is stripped before matching, so a blank term
    /// filters nothing.
    pub search_term: String,
    /// Inclusive price bounds.
    pub price_range: (Decimal, Decimal),
    pub sort: SortKey,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            category: CategoryFilter::All,
            search_term: String::new(),
            price_range: (Decimal::ZERO, Decimal::MAX),
            sort: SortKey::Default,
        }
    }
}

/// Produce the display list for `spec` from the full product list.
///
/// Filters are applied in order (category, search, price range), then the
/// sort. All sorts are stable: ties keep their original relative order.
#[must_use]
pub fn filter(products: &[Product], spec: &FilterSpec) -> Vec<Product> {
    let term = spec.search_term.trim().to_lowercase();
    let (min, max) = spec.price_range;

    let mut result: Vec<Product> = products
        .iter()
        .filter(|p| spec.category.matches(p))
        .filter(|p| {
            term.is_empty()
                || p.title.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
        })
        .filter(|p| p.price >= min && p.price <= max)
        .cloned()
        .collect();

    match spec.sort {
        SortKey::Default => {}
        SortKey::PriceAscending => result.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDescending => result.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::NameAscending => {
            result.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        }
    }

    result
}

/// Distinct categories in first-seen order, for the category dropdown.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
