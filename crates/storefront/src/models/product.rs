//! Catalog product types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use darccuir_core::{ProductId, Rubro, SubrubroId};

/// Cover images sent with listing entries (search results, similar products).
pub const LISTING_COVER_IMAGES: usize = 2;

/// A product as returned by catalog search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub cover_images: Vec<String>,
    pub variants: serde_json::Value,
    pub stock: i32,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_snippet: Option<String>,
}

/// A product related to the one being viewed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarProduct {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub cover_images: Vec<String>,
    pub variants: serde_json::Value,
    pub stock: i32,
    #[serde(rename = "subrubros")]
    pub subrubro_ids: Vec<SubrubroId>,
}

/// Full product detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub guia_talles: String,
    pub price: Decimal,
    /// Only sent to wholesale customers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_wholesale: Option<Decimal>,
    pub cover_images: Vec<String>,
    pub variants: serde_json::Value,
    pub rubro: Rubro,
    #[serde(rename = "subrubros")]
    pub subrubro_ids: Vec<SubrubroId>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
