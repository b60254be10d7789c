//! Session-related types.

use serde::{Deserialize, Serialize};

use darccuir_core::{Email, UserId};

use super::User;

/// Session-stored identity of the logged-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
}

impl From<&User> for CurrentAdmin {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
        }
    }
}

/// Session keys.
pub mod keys {
    /// The logged-in administrator.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
