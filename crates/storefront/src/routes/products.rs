//! Catalog route handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header::CACHE_CONTROL,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use darccuir_core::{PriceType, ProductId};

use super::parse_rubro;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{Product, SimilarProduct};
use crate::services::catalog::{CatalogQuery, search_catalog};
use crate::services::similar::{MAX_LIMIT, SimilarOptions, similar_products};
use crate::state::AppState;

/// Query string of the similar-products endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarQuery {
    pub limit: Option<String>,
    pub include_subrubros: Option<String>,
    pub include_price_range: Option<String>,
}

impl SimilarQuery {
    /// Options with defaults for anything missing or unparseable.
    #[must_use]
    pub fn options(&self) -> SimilarOptions {
        let defaults = SimilarOptions::default();
        SimilarOptions {
            limit: self
                .limit
                .as_deref()
                .and_then(|l| l.trim().parse::<u32>().ok())
                .map_or(defaults.limit, |l| l.clamp(1, MAX_LIMIT)),
            include_subrubros: parse_flag(self.include_subrubros.as_deref())
                .unwrap_or(defaults.include_subrubros),
            include_price_range: parse_flag(self.include_price_range.as_deref())
                .unwrap_or(defaults.include_price_range),
        }
    }
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw?.trim() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| AppError::NotFound("Producto no encontrado".to_owned()))
}

/// `GET /api/products/{rubro}`: paginated catalog listing and search.
#[instrument(skip(state, query), fields(q = query.q.as_deref()))]
pub async fn search(
    State(state): State<AppState>,
    Path(rubro): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<Response> {
    let rubro = parse_rubro(&rubro)?;

    let page = search_catalog(state.pool(), rubro, &query)
        .await
        .map_err(|e| AppError::failed("Error al cargar productos", e))?;

    Ok(([(CACHE_CONTROL, page.cache_control())], Json(page)).into_response())
}

/// `GET /api/products/{rubro}/{id}`: product detail.
///
/// The wholesale price is only included for wholesale customers.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path((rubro, id)): Path<(String, String)>,
) -> Result<Json<Product>> {
    let rubro = parse_rubro(&rubro)?;
    let id = parse_product_id(&id)?;

    let mut product = ProductRepository::new(state.pool())
        .get_active(id, rubro)
        .await
        .map_err(|e| AppError::failed("Error al cargar el producto", e))?
        .ok_or_else(|| AppError::NotFound("Producto no encontrado".to_owned()))?;

    let wholesale = user.is_some_and(|u| u.role.price_type() == PriceType::Mayorista);
    if !wholesale {
        product.price_wholesale = None;
    }

    Ok(Json(product))
}

/// `GET /api/products/{rubro}/{id}/similar`: related products.
///
/// Always answers with a list; lookup failures yield `[]`.
#[instrument(skip(state, query))]
pub async fn similar(
    State(state): State<AppState>,
    Path((rubro, id)): Path<(String, String)>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<Vec<SimilarProduct>>> {
    parse_rubro(&rubro)?;
    let id = parse_product_id(&id)?;
    let options = query.options();

    if let Some(cached) = state.cache().similar(id, options).await {
        return Ok(Json(cached.as_ref().clone()));
    }

    let products = similar_products(&ProductRepository::new(state.pool()), id, options).await;
    if !products.is_empty() {
        state
            .cache()
            .insert_similar(id, options, Arc::new(products.clone()))
            .await;
    }

    Ok(Json(products))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similar_query_defaults() {
        assert_eq!(SimilarQuery::default().options(), SimilarOptions::default());
    }

    #[test]
    fn test_similar_query_parses_flags_and_clamps_limit() {
        let query = SimilarQuery {
            limit: Some("500".to_owned()),
            include_subrubros: Some("false".to_owned()),
            include_price_range: Some("maybe".to_owned()),
        };
        let options = query.options();
        assert_eq!(options.limit, MAX_LIMIT);
        assert!(!options.include_subrubros);
        assert!(options.include_price_range);
    }

    #[test]
    fn test_product_id_not_numeric_is_not_found() {
        assert!(matches!(
            parse_product_id("bolso-matero"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(parse_product_id("42").ok(), Some(ProductId::new(42)));
    }
}
