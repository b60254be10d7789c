//! Registration and login route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService, Credentials, Registration};
use crate::state::AppState;

/// `POST /api/auth/register`: create a retail or wholesale account.
#[instrument(skip(state, registration), fields(role = %registration.role))]
pub async fn register(
    State(state): State<AppState>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<Value>)> {
    AuthService::new(state.pool())
        .register(registration)
        .await
        .map_err(|e| match e {
            AuthError::Repository(_) | AuthError::PasswordHash => {
                AppError::failed("Error al registrar usuario", e)
            }
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Usuario registrado correctamente" })),
    ))
}

/// `POST /api/auth/login`: check credentials and start a session.
#[instrument(skip(state, session, credentials))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> Result<Json<CurrentUser>> {
    let user = AuthService::new(state.pool()).login(&credentials).await?;
    let current = CurrentUser::from(&user);

    set_current_user(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));
    tracing::info!(user_id = %current.id, "User logged in");

    Ok(Json(current))
}

/// `POST /api/auth/logout`: end the customer session.
///
/// An anonymous cart id stays in the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/auth/session`: the logged-in customer.
#[instrument(skip(user))]
pub async fn session(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}
