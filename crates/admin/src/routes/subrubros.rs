//! Subrubro management handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use darccuir_core::SubrubroId;
use darccuir_core::tree::{Subrubro, SubrubroNode, load_subrubro_tree};

use super::parse_rubro;
use crate::db::SubrubroRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::SubrubroListItem;
use crate::services::subrubros::{SubrubroRequest, SubrubroService};
use crate::state::AppState;

/// Query string of `GET /api/subrubros/tree`.
#[derive(Debug, Default, Deserialize)]
pub struct TreeQuery {
    pub rubro: Option<String>,
}

/// `GET /api/subrubros`: flat list with the name of each parent.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<SubrubroListItem>>> {
    let subrubros = SubrubroRepository::new(state.pool())
        .list_all()
        .await
        .map_err(|e| AppError::failed("Error al cargar subrubros", e))?;
    Ok(Json(subrubros))
}

/// `GET /api/subrubros/tree?rubro=`: the category tree of one rubro.
#[instrument(skip(state, _admin, query))]
pub async fn tree(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<TreeQuery>,
) -> Result<Json<Vec<SubrubroNode>>> {
    let rubro = parse_rubro(query.rubro.as_deref())?
        .ok_or_else(|| AppError::BadRequest("Rubro inválido".to_owned()))?;

    let tree = load_subrubro_tree(&SubrubroRepository::new(state.pool()), None, rubro)
        .await
        .map_err(|e| AppError::failed("Error al cargar subrubros", e))?;
    Ok(Json(tree))
}

/// `POST /api/subrubros`.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<SubrubroRequest>,
) -> Result<(StatusCode, Json<Subrubro>)> {
    let subrubro = SubrubroService::new(state.pool()).create(request).await?;
    Ok((StatusCode::CREATED, Json(subrubro)))
}

/// `DELETE /api/subrubros/{id}`: also unlinks it from every product.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id: SubrubroId = id
        .parse()
        .map_err(|_| AppError::NotFound("Subrubro no encontrado".to_owned()))?;

    SubrubroService::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
