//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding; clients only ever see a JSON `{"error": ...}`
//! body with a public message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Generic message for server errors without a more specific one.
const INTERNAL_MESSAGE: &str = "Error interno del servidor";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Server-side failure reported to the client with a fixed message.
    #[error("{message}: {source}")]
    Failed {
        message: &'static str,
        #[source]
        source: BoxError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// A server error whose response body is `message`.
    pub fn failed(message: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Failed {
            message,
            source: source.into(),
        }
    }

    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Failed { .. } => true,
            Self::Auth(err) => matches!(err, AuthError::Repository(_) | AuthError::PasswordHash),
            Self::Cart(err) => matches!(err, CartError::Repository(_) | CartError::Session(_)),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Failed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::InvalidEmail(_)
                | AuthError::MissingCredentials
                | AuthError::UserAlreadyExists
                | AuthError::PasswordRequired
                | AuthError::RoleNotAllowed(_)
                | AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::ProductNotFound(_) | CartError::ItemNotFound(_) => StatusCode::NOT_FOUND,
                CartError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                CartError::Session(_) | CartError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Session(_) => INTERNAL_MESSAGE.to_owned(),
            Self::Failed { message, .. } => (*message).to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Email inválido".to_owned(),
                AuthError::MissingCredentials => "Email y contraseña son requeridos".to_owned(),
                AuthError::InvalidCredentials => "Credenciales inválidas".to_owned(),
                AuthError::UserAlreadyExists => "El usuario ya existe".to_owned(),
                AuthError::PasswordRequired => {
                    "La contraseña es obligatoria para minoristas".to_owned()
                }
                AuthError::RoleNotAllowed(_) => "Rol inválido".to_owned(),
                AuthError::MissingField(field) => format!("El campo {field} es obligatorio"),
                AuthError::Repository(_) | AuthError::PasswordHash => INTERNAL_MESSAGE.to_owned(),
            },
            Self::Cart(err) => match err {
                CartError::ProductNotFound(_) => "Producto no encontrado".to_owned(),
                CartError::ItemNotFound(_) => "Item no encontrado en el carrito".to_owned(),
                CartError::InvalidQuantity(_) => "Cantidad inválida".to_owned(),
                CartError::Session(_) | CartError::Repository(_) => INTERNAL_MESSAGE.to_owned(),
            },
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Producto no encontrado".to_string());
        assert_eq!(err.to_string(), "Not found: Producto no encontrado");

        let err = AppError::failed("Error al cargar productos", "pool timed out");
        assert_eq!(err.to_string(), "Error al cargar productos: pool timed out");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::failed("Error al cargar productos", "pool timed out")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_messages_hide_internals() {
        let err = AppError::failed("Error al cargar productos", "relation does not exist");
        assert_eq!(err.public_message(), "Error al cargar productos");

        let err = AppError::Database(RepositoryError::NotFound);
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);

        let err = AppError::Auth(AuthError::PasswordRequired);
        assert_eq!(
            err.public_message(),
            "La contraseña es obligatoria para minoristas"
        );
    }
}
