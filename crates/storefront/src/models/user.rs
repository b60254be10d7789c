//! Customer account types.

use chrono::{DateTime, Utc};

use darccuir_core::{Email, UserId, UserRole};

/// A store account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: UserRole,
    /// Wholesale contact phone.
    pub phone: Option<String>,
    /// Wholesale store name.
    pub store_name: Option<String>,
    /// Wholesale town.
    pub localidad: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new account.
///
/// `password_hash` is `None` for wholesale registrations.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub phone: Option<String>,
    pub store_name: Option<String>,
    pub localidad: Option<String>,
}
