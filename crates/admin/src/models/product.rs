//! Product management types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use darccuir_core::paging::Pagination;
use darccuir_core::{ProductId, Rubro, SubrubroId};

/// A product with every column, active or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub guia_talles: String,
    pub price: Decimal,
    pub price_wholesale: Option<Decimal>,
    pub cover_images: Vec<String>,
    pub variants: serde_json::Value,
    pub rubro: Rubro,
    #[serde(rename = "subrubros")]
    pub subrubro_ids: Vec<SubrubroId>,
    pub active: bool,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated product, ready to insert or to replace an existing row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub guia_talles: String,
    pub price: Decimal,
    pub price_wholesale: Option<Decimal>,
    pub cover_images: Vec<String>,
    pub variants: serde_json::Value,
    pub rubro: Rubro,
    pub subrubro_ids: Vec<SubrubroId>,
    pub active: bool,
    pub stock: i32,
}

/// Response of `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    pub productos: Vec<Product>,
    pub pagination: Pagination,
}

/// Current prices of a product, looked up by SKU during a price import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedProduct {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    pub price_wholesale: Option<Decimal>,
}
