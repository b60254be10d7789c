//! Authentication service.
//!
//! Retail customers register with a password. Wholesale customers register
//! without one and leave their shop details for follow-up; they cannot log
//! in until a password is set for them.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use sqlx::PgPool;

use darccuir_core::{Email, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::{NewUser, User};

/// Registration form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub localidad: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

/// Login form. Fields are optional so a missing one maps to a 400 instead of
/// a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Authentication service.
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

    /// Register a retail or wholesale customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::PasswordRequired` for a retail registration without password.
    /// Returns `AuthError::RoleNotAllowed` for an admin registration.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password = validate_registration(&registration)?;
        let password_hash = password.map(hash_password).transpose()?;
        let new_user = build_new_user(registration, email, password_hash);

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either field is blank.
    /// Returns `AuthError::InvalidCredentials` if the user is unknown, has no
    /// password, or the password is wrong.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let (email, password) = match (&credentials.email, &credentials.password) {
            (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
            _ => return Err(AuthError::MissingCredentials),
        };

        // A malformed address can't belong to anyone.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let password_hash = password_hash.ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Check role-specific rules and return the password to hash, if any.
fn validate_registration(registration: &Registration) -> Result<Option<&str>, AuthError> {
    if registration.first_name.trim().is_empty() {
        return Err(AuthError::MissingField("firstName"));
    }
    if registration.last_name.trim().is_empty() {
        return Err(AuthError::MissingField("lastName"));
    }

    match registration.role {
        UserRole::Admin => Err(AuthError::RoleNotAllowed(UserRole::Admin)),
        UserRole::Minorista => match registration.password.as_deref() {
            Some(p) if !p.is_empty() => Ok(Some(p)),
            _ => Err(AuthError::PasswordRequired),
        },
        UserRole::Mayorista => Ok(None),
    }
}

/// Build the row to insert. Retail accounts drop the wholesale-only fields.
fn build_new_user(
    registration: Registration,
    email: Email,
    password_hash: Option<String>,
) -> NewUser {
    let wholesale = registration.role == UserRole::Mayorista;
    let keep = |field: Option<String>| {
        if wholesale {
            field.filter(|v| !v.trim().is_empty())
        } else {
            None
        }
    };

    NewUser {
        first_name: registration.first_name.trim().to_owned(),
        last_name: registration.last_name.trim().to_owned(),
        email,
        password_hash,
        role: registration.role,
        phone: keep(registration.phone),
        store_name: keep(registration.store_name),
        localidad: keep(registration.localidad),
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration(role: UserRole, password: Option<&str>) -> Registration {
        Registration {
            first_name: "Ana".to_owned(),
            last_name: "Pérez".to_owned(),
            email: "ana@example.com".to_owned(),
            password: password.map(str::to_owned),
            phone: Some("3415550000".to_owned()),
            store_name: Some("Talabartería Ana".to_owned()),
            localidad: Some("Rosario".to_owned()),
            role,
        }
    }

    #[test]
    fn test_retail_requires_password() {
        let reg = registration(UserRole::Minorista, None);
        assert!(matches!(
            validate_registration(&reg),
            Err(AuthError::PasswordRequired)
        ));

        let reg = registration(UserRole::Minorista, Some(""));
        assert!(matches!(
            validate_registration(&reg),
            Err(AuthError::PasswordRequired)
        ));

        let reg = registration(UserRole::Minorista, Some("hunter22"));
        assert_eq!(validate_registration(&reg).unwrap(), Some("hunter22"));
    }

    #[test]
    fn test_wholesale_ignores_password() {
        let reg = registration(UserRole::Mayorista, Some("hunter22"));
        assert_eq!(validate_registration(&reg).unwrap(), None);
    }

    #[test]
    fn test_admin_cannot_register() {
        let reg = registration(UserRole::Admin, Some("hunter22"));
        assert!(matches!(
            validate_registration(&reg),
            Err(AuthError::RoleNotAllowed(UserRole::Admin))
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut reg = registration(UserRole::Minorista, Some("hunter22"));
        reg.last_name = "  ".to_owned();
        assert!(matches!(
            validate_registration(&reg),
            Err(AuthError::MissingField("lastName"))
        ));
    }

    #[test]
    fn test_retail_drops_wholesale_fields() {
        let reg = registration(UserRole::Minorista, Some("hunter22"));
        let email = Email::parse(&reg.email).unwrap();
        let user = build_new_user(reg, email, Some("hash".to_owned()));
        assert_eq!(user.phone, None);
        assert_eq!(user.store_name, None);
        assert_eq!(user.localidad, None);
        assert_eq!(user.password_hash.as_deref(), Some("hash"));
    }

    #[test]
    fn test_wholesale_keeps_shop_fields() {
        let reg = registration(UserRole::Mayorista, None);
        let email = Email::parse(&reg.email).unwrap();
        let user = build_new_user(reg, email, None);
        assert_eq!(user.store_name.as_deref(), Some("Talabartería Ana"));
        assert_eq!(user.localidad.as_deref(), Some("Rosario"));
        assert_eq!(user.password_hash, None);
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
