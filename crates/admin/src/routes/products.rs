//! Product CRUD handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use darccuir_core::ProductId;
use darccuir_core::paging::{Pagination, Paging};

use super::parse_rubro;
use crate::db::{ProductListFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductListing};
use crate::services::products::{ProductInput, ProductService};
use crate::state::AppState;

/// Query string of `GET /api/products`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub rubro: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> Result<ProductListFilter> {
        Ok(ProductListFilter {
            rubro: parse_rubro(self.rubro.as_deref())?,
            query: self
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
        })
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Producto no encontrado".to_owned())
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse().map_err(|_| not_found())
}

/// `GET /api/products`: every product, active or not, newest first.
#[instrument(skip(state, _admin, query), fields(q = query.q.as_deref()))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListing>> {
    let filter = query.filter()?;
    let paging = Paging::parse(query.page.as_deref(), query.limit.as_deref());

    let (productos, total) = ProductRepository::new(state.pool())
        .list(&filter, paging.offset(), paging.limit)
        .await
        .map_err(|e| AppError::failed("Error al cargar productos", e))?;

    Ok(Json(ProductListing {
        productos,
        pagination: Pagination::new(paging, total),
    }))
}

/// `GET /api/products/{id}`.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// `POST /api/products`.
#[instrument(skip(state, admin, input), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductService::new(state.pool()).create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/products/{id}`: replace every field; omitted ones get defaults.
#[instrument(skip(state, admin, input), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;
    let product = ProductService::new(state.pool()).update(id, input).await?;
    Ok(Json(product))
}

/// `DELETE /api/products/{id}`. Cart lines holding it go with it.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_product_id(&id)?;
    if !ProductRepository::new(state.pool()).delete(id).await? {
        return Err(not_found());
    }

    tracing::info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use darccuir_core::Rubro;

    use super::*;

    #[test]
    fn test_list_filter() {
        let query = ListQuery {
            rubro: Some("yatay".to_owned()),
            q: Some("  mate ".to_owned()),
            ..ListQuery::default()
        };
        let filter = query.filter().unwrap();
        assert_eq!(filter.rubro, Some(Rubro::Yatay));
        assert_eq!(filter.query.as_deref(), Some("mate"));
    }

    #[test]
    fn test_blank_search_ignored() {
        let query = ListQuery {
            q: Some("   ".to_owned()),
            ..ListQuery::default()
        };
        assert_eq!(query.filter().unwrap(), ProductListFilter::default());
    }

    #[test]
    fn test_bad_rubro_rejected() {
        let query = ListQuery {
            rubro: Some("otros".to_owned()),
            ..ListQuery::default()
        };
        assert!(matches!(query.filter(), Err(AppError::BadRequest(_))));
    }
}
