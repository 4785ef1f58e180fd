//! Demo catalog
//!
//! A small read-only product list served behind the response cache so the
//! binary has cacheable routes to put traffic through.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::handlers::AppState;
use crate::error::{CacheError, Result};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub price_cents: u64,
}

/// In-memory product list. `lookups` counts handler invocations, which makes
/// cache hits observable from outside.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    lookups: AtomicU64,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            lookups: AtomicU64::new(0),
        }
    }

    /// A handful of fixed products.
    pub fn demo() -> Self {
        let product = |id, name: &str, category: &str, price_cents| Product {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price_cents,
        };
        Self::new(vec![
            product(1, "Trail Backpack", "outdoor", 8900),
            product(2, "Camp Stove", "outdoor", 4500),
            product(3, "Espresso Grinder", "kitchen", 12900),
            product(4, "Cast Iron Pan", "kitchen", 3900),
            product(5, "Reading Lamp", "home", 2900),
        ])
    }

    pub fn list(&self, category: Option<&str>) -> Vec<Product> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect()
    }

    pub fn find(&self, id: u32) -> Option<Product> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.products.iter().find(|p| p.id == id).cloned()
    }

    /// Number of list/find calls served so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Handler for GET /api/catalog
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Json<Vec<Product>> {
    Json(state.catalog.list(query.category.as_deref()))
}

/// Handler for GET /api/catalog/:id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Product>> {
    state
        .catalog
        .find(id)
        .map(Json)
        .ok_or_else(|| CacheError::NotFound(format!("product {}", id)))
}
