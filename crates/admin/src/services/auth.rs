//! Back-office authentication and account creation.
//!
//! Administrators are ordinary `shop.user` rows with the `admin` role. They
//! log in with the same credential check as customers; any other role is
//! turned away after the password is verified.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use darccuir_core::{Email, EmailError, UserRole};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{NewUser, User};

/// Errors that can occur during authentication and account creation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email or password missing from the login form.
    #[error("missing credentials")]
    MissingCredentials,

    /// Unknown email, account without password, or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Valid credentials of a non-admin account.
    #[error("role {0} cannot use the back-office")]
    NotAdmin(UserRole),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Required field missing or blank.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Back-office authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Log an administrator in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if the check fails.
    /// Returns `AuthError::NotAdmin` if the account is not an administrator.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let (email, password) = match (&credentials.email, &credentials.password) {
            (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
            _ => return Err(AuthError::MissingCredentials),
        };

        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let password_hash = password_hash.ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if user.role != UserRole::Admin {
            tracing::warn!(user_id = %user.id, role = %user.role, "Non-admin back-office login");
            return Err(AuthError::NotAdmin(user.role));
        }

        Ok(user)
    }

    /// Create an account of any role with a password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for a blank name or password.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, AuthError> {
        let new_user = prepare_user(request)?;

        if self.users.get_by_email(&new_user.email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User created from back-office");
        Ok(user)
    }
}

/// Validate a create-user request and hash its password.
fn prepare_user(request: CreateUserRequest) -> Result<NewUser, AuthError> {
    let first_name = request.first_name.trim();
    if first_name.is_empty() {
        return Err(AuthError::MissingField("firstName"));
    }
    let last_name = request.last_name.trim();
    if last_name.is_empty() {
        return Err(AuthError::MissingField("lastName"));
    }
    if request.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }

    let email = Email::parse(&request.email)?;
    let password_hash = hash_password(&request.password)?;

    Ok(NewUser {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email,
        password_hash,
        role: request.role,
    })
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn request(password: &str) -> CreateUserRequest {
        CreateUserRequest {
            first_name: " Laura ".to_owned(),
            last_name: "Gómez".to_owned(),
            email: "laura@darccuir.com.ar".to_owned(),
            password: password.to_owned(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn test_prepare_user_hashes_password() {
        let user = prepare_user(request("cuero-curtido-42")).unwrap();
        assert_eq!(user.first_name, "Laura");
        assert_eq!(user.role, UserRole::Admin);
        assert_ne!(user.password_hash, "cuero-curtido-42");
        assert!(verify_password("cuero-curtido-42", &user.password_hash).is_ok());
    }

    #[test]
    fn test_prepare_user_requires_password() {
        assert!(matches!(
            prepare_user(request("")),
            Err(AuthError::MissingField("password"))
        ));
    }

    #[test]
    fn test_prepare_user_rejects_bad_email() {
        let mut req = request("cuero-curtido-42");
        req.email = "laura-at-darccuir".to_owned();
        assert!(matches!(prepare_user(req), Err(AuthError::InvalidEmail(_))));
    }

    #[test]
    fn test_verify_password_wrong() {
        let hash = hash_password("correcta").unwrap();
        assert!(matches!(
            verify_password("incorrecta", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        // Never connects: the form is rejected before any query.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/darccuir_unused")
            .unwrap();
        let service = AuthService::new(&pool);

        let credentials = Credentials {
            email: Some("admin@darccuir.com.ar".to_owned()),
            password: None,
        };
        assert!(matches!(
            service.login(&credentials).await,
            Err(AuthError::MissingCredentials)
        ));
    }
}
