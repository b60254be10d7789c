//! Unified error handling for admin.
//!
//! Every error renders as JSON `{"error": ...}`. Validation failures add a
//! `details` array with one entry per rejected field.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::import::ImportError;
use crate::services::products::ProductError;
use crate::services::subrubros::SubrubroError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const INTERNAL_MESSAGE: &str = "Error interno del servidor";

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    #[error("Subrubro error: {0}")]
    Subrubro(#[from] SubrubroError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Multipart body could not be read (malformed or over the size limit).
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

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

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Session(_) | Self::Failed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::NotAdmin(_) => StatusCode::FORBIDDEN,
                AuthError::MissingCredentials
                | AuthError::InvalidEmail(_)
                | AuthError::UserAlreadyExists
                | AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Product(err) => match err {
                ProductError::Invalid(_) => StatusCode::BAD_REQUEST,
                ProductError::NotFound(_) => StatusCode::NOT_FOUND,
                ProductError::DuplicateSku => StatusCode::CONFLICT,
                ProductError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Subrubro(err) => match err {
                SubrubroError::NameRequired
                | SubrubroError::InvalidRubro
                | SubrubroError::EmptySlug
                | SubrubroError::ParentNotFound(_) => StatusCode::BAD_REQUEST,
                SubrubroError::DuplicateSlug | SubrubroError::HasChildren(_) => {
                    StatusCode::CONFLICT
                }
                SubrubroError::NotFound(_) => StatusCode::NOT_FOUND,
                SubrubroError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Import(err) => match err {
                ImportError::MissingFile
                | ImportError::InvalidPriceType
                | ImportError::NoValidRows => StatusCode::BAD_REQUEST,
                ImportError::Workbook(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Multipart(err) => err.status(),
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
                AuthError::MissingCredentials => "Email y contraseña son requeridos".to_owned(),
                AuthError::InvalidCredentials => "Credenciales inválidas".to_owned(),
                AuthError::NotAdmin(_) => "Acceso restringido a administradores".to_owned(),
                AuthError::InvalidEmail(_) => "Email inválido".to_owned(),
                AuthError::UserAlreadyExists => "El usuario ya existe".to_owned(),
                AuthError::MissingField(field) => format!("El campo {field} es obligatorio"),
                AuthError::PasswordHash | AuthError::Repository(_) => INTERNAL_MESSAGE.to_owned(),
            },
            Self::Product(err) => match err {
                ProductError::Invalid(_) => "Datos de producto inválidos".to_owned(),
                ProductError::NotFound(_) => "Producto no encontrado".to_owned(),
                ProductError::DuplicateSku => "Ya existe un producto con ese SKU".to_owned(),
                ProductError::Repository(_) => INTERNAL_MESSAGE.to_owned(),
            },
            Self::Subrubro(err) => match err {
                SubrubroError::NameRequired => "El nombre es obligatorio".to_owned(),
                SubrubroError::InvalidRubro => "Rubro inválido".to_owned(),
                SubrubroError::EmptySlug => "No se pudo generar el slug".to_owned(),
                SubrubroError::ParentNotFound(_) => {
                    "El subrubro padre no existe en ese rubro".to_owned()
                }
                SubrubroError::DuplicateSlug => {
                    "Ya existe un subrubro con ese slug en el rubro".to_owned()
                }
                SubrubroError::HasChildren(_) => {
                    "No se puede eliminar un subrubro con subrubros hijos".to_owned()
                }
                SubrubroError::NotFound(_) => "Subrubro no encontrado".to_owned(),
                SubrubroError::Repository(_) => INTERNAL_MESSAGE.to_owned(),
            },
            Self::Import(err) => match err {
                ImportError::MissingFile => "No se proporcionó ningún archivo".to_owned(),
                ImportError::InvalidPriceType => "Tipo de precio inválido".to_owned(),
                ImportError::NoValidRows => {
                    "No se encontraron filas válidas en el archivo".to_owned()
                }
                ImportError::Workbook(reason) => format!("Error al procesar el archivo: {reason}"),
            },
            Self::Multipart(err) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                "El archivo supera el tamaño máximo permitido".to_owned()
            }
            Self::Multipart(_) => "No se pudo leer el formulario enviado".to_owned(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let body = match &self {
            Self::Product(ProductError::Invalid(details)) => {
                json!({ "error": self.public_message(), "details": details })
            }
            _ => json!({ "error": self.public_message() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
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

#[cfg(test)]
mod tests {
    use darccuir_core::{SubrubroId, UserRole};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Usuario no encontrado".to_string());
        assert_eq!(err.to_string(), "Not found: Usuario no encontrado");
    }

    #[test]
    fn test_auth_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::NotAdmin(UserRole::Mayorista))),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_conflicts() {
        assert_eq!(
            get_status(AppError::Product(ProductError::DuplicateSku)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Subrubro(SubrubroError::HasChildren(SubrubroId::new(3)))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_import_messages() {
        let err = AppError::Import(ImportError::MissingFile);
        assert_eq!(err.public_message(), "No se proporcionó ningún archivo");

        let err = AppError::Import(ImportError::Workbook("Cannot detect file format".to_owned()));
        assert_eq!(
            err.public_message(),
            "Error al procesar el archivo: Cannot detect file format"
        );
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad email".to_owned()));
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);

        let err = AppError::failed("Error al cargar usuarios", "pool timed out");
        assert_eq!(err.public_message(), "Error al cargar usuarios");
    }
}
