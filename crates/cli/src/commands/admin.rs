//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! darccuir-cli admin create -e admin@darccuir.com.ar -p 'secreto' -f Ana -l Pérez
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use darccuir_admin::services::auth::{AuthError, AuthService, CreateUserRequest};
use darccuir_core::UserRole;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: ADMIN_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// The account could not be created.
    #[error("Could not create admin: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new admin user with a hashed password.
///
/// An existing account with the same email is left untouched and counts as
/// success, so the command can run on every deploy.
///
/// # Errors
///
/// Returns an error if the input is invalid or the database is unreachable.
pub async fn create_user(
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), AdminError> {
    let database_url = super::database_url().map_err(|_| AdminError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Creating admin user: {}", email);

    let request = CreateUserRequest {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
        role: UserRole::Admin,
    };

    match AuthService::new(&pool).create_user(request).await {
        Ok(user) => {
            tracing::info!(
                "Admin user created successfully! ID: {}, Email: {}",
                user.id,
                user.email
            );
            Ok(())
        }
        Err(AuthError::UserAlreadyExists) => {
            tracing::warn!("A user with email {} already exists, nothing to do", email);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
