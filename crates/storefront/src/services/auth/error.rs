//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] darccuir_core::EmailError),

    /// Email or password missing from a login attempt.
    #[error("missing credentials")]
    MissingCredentials,

    /// Invalid credentials (unknown user, no password set, or wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Retail registration without a password.
    #[error("password required for retail accounts")]
    PasswordRequired,

    /// Role that cannot be chosen at registration.
    #[error("role not allowed: {0}")]
    RoleNotAllowed(darccuir_core::UserRole),

    /// A required registration field is blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
