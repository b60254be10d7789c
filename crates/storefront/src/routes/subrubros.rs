//! Category tree route handler.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use darccuir_core::tree::{SubrubroNode, load_subrubro_tree};

use super::parse_rubro;
use crate::db::SubrubroRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// `GET /api/subrubros/{rubro}`: active category tree, cached per rubro.
#[instrument(skip(state))]
pub async fn tree(
    State(state): State<AppState>,
    Path(rubro): Path<String>,
) -> Result<Json<Vec<SubrubroNode>>> {
    let rubro = parse_rubro(&rubro)?;

    if let Some(cached) = state.cache().subrubro_tree(rubro).await {
        return Ok(Json(cached.as_ref().clone()));
    }

    let tree = load_subrubro_tree(&SubrubroRepository::new(state.pool()), None, rubro)
        .await
        .map_err(|e| AppError::failed("Error al cargar subrubros", e))?;

    state
        .cache()
        .insert_subrubro_tree(rubro, Arc::new(tree.clone()))
        .await;

    Ok(Json(tree))
}
