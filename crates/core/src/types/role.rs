//! Customer roles and price lists.

use serde::{Deserialize, Serialize};

/// Role of a store account.
///
/// Retail customers (`minorista`) register with a password. Wholesale
/// customers (`mayorista`) are contacted by the store and pay the wholesale
/// price list. Only `admin` accounts can enter the back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Back-office access.
    Admin,
    /// Retail customer.
    #[default]
    Minorista,
    /// Wholesale customer.
    Mayorista,
}

impl UserRole {
    /// Returns the lowercase wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Minorista => "minorista",
            Self::Mayorista => "mayorista",
        }
    }

    /// Which price list this role pays.
    #[must_use]
    pub const fn price_type(&self) -> PriceType {
        match self {
            Self::Mayorista => PriceType::Mayorista,
            Self::Admin | Self::Minorista => PriceType::Minorista,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "minorista" => Ok(Self::Minorista),
            "mayorista" => Ok(Self::Mayorista),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Price list a bulk import updates, or a customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// Retail price (`price` column).
    Minorista,
    /// Wholesale price (`price_wholesale` column).
    Mayorista,
}

impl PriceType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minorista => "minorista",
            Self::Mayorista => "mayorista",
        }
    }
}

impl std::fmt::Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PriceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minorista" => Ok(Self::Minorista),
            "mayorista" => Ok(Self::Mayorista),
            _ => Err(format!("invalid price type: {s}")),
        }
    }
}
