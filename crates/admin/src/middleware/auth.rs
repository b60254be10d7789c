//! Authentication extractor and session helpers for admin.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use darccuir_core::UserRole;

use crate::db::UserRepository;
use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in administrator.
///
/// The role is re-read from the database on every request, so demoting an
/// account takes effect without waiting for its session to expire.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hola, {}!", admin.first_name)
/// }
/// ```
pub struct RequireAdmin(pub CurrentAdmin);

/// Rejection for [`RequireAdmin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRejection {
    /// No admin in the session, or the account no longer exists.
    Unauthorized,
    /// The account exists but is not an administrator.
    Forbidden,
    /// The role could not be checked.
    Unavailable,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "No autenticado"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Acceso restringido a administradores"),
            Self::Unavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error interno del servidor",
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::Unauthorized)?;

        let admin: CurrentAdmin = session
            .get(session_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection::Unauthorized)?;

        match UserRepository::new(state.pool()).role_of(admin.id).await {
            Ok(Some(UserRole::Admin)) => Ok(Self(admin)),
            Ok(Some(role)) => {
                tracing::warn!(user_id = %admin.id, %role, "Session of demoted admin");
                Err(AdminRejection::Forbidden)
            }
            Ok(None) => Err(AdminRejection::Unauthorized),
            Err(e) => {
                tracing::error!(error = %e, user_id = %admin.id, "Failed to check admin role");
                Err(AdminRejection::Unavailable)
            }
        }
    }
}

/// Store the logged-in administrator in the session.
///
/// The session id is cycled first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Drop the whole admin session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted from the store.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AdminRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AdminRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AdminRejection::Unavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
