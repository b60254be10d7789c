//! User management handlers.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService, CreateUserRequest};
use crate::state::AppState;

/// `GET /api/users`: every account, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool())
        .list_all()
        .await
        .map_err(|e| AppError::failed("Error al cargar usuarios", e))?;
    Ok(Json(users))
}

/// `POST /api/users`: create an account of any role.
#[instrument(skip(state, admin, request), fields(admin_id = %admin.id, role = %request.role))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AuthService::new(state.pool())
        .create_user(request)
        .await
        .map_err(|e| match e {
            AuthError::Repository(_) | AuthError::PasswordHash => {
                AppError::failed("Error al crear usuario", e)
            }
            other => other.into(),
        })?;

    Ok((StatusCode::CREATED, Json(user)))
}
