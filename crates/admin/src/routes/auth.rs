//! Admin login and logout.

use axum::{Json, extract::State, http::StatusCode};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AuthService, Credentials};
use crate::state::AppState;

/// `POST /auth/login`: check credentials and start an admin session.
#[instrument(skip(state, session, credentials))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(credentials): Json<Credentials>,
) -> Result<Json<CurrentAdmin>> {
    let user = AuthService::new(state.pool()).login(&credentials).await?;
    let admin = CurrentAdmin::from(&user);

    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.id, Some(admin.email.as_str()));
    tracing::info!(user_id = %admin.id, "Admin logged in");

    Ok(Json(admin))
}

/// `POST /auth/logout`: drop the admin session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}
