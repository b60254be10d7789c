//! Store accounts as seen from the back-office.

use chrono::{DateTime, Utc};
use serde::Serialize;

use darccuir_core::{Email, UserId, UserRole};

/// A store account. The password hash is never loaded into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub role: UserRole,
    pub phone: Option<String>,
    pub store_name: Option<String>,
    pub localidad: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting an account created by an administrator.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: UserRole,
}
