//! Product lines.

use serde::{Deserialize, Serialize};

/// Error returned when a path or form value names an unknown rubro.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid rubro: {0}")]
pub struct InvalidRubro(pub String);

/// Top-level product line. Every product and subrubro belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.rubro", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Rubro {
    Darccuir,
    Yatay,
}

impl Rubro {
    /// All rubros, in display order.
    pub const ALL: [Self; 2] = [Self::Darccuir, Self::Yatay];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Darccuir => "darccuir",
            Self::Yatay => "yatay",
        }
    }
}

impl std::fmt::Display for Rubro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rubro {
    type Err = InvalidRubro;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "darccuir" => Ok(Self::Darccuir),
            "yatay" => Ok(Self::Yatay),
            _ => Err(InvalidRubro(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed() {
        assert_eq!("darccuir".parse(), Ok(Rubro::Darccuir));
        assert_eq!("yatay".parse(), Ok(Rubro::Yatay));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            "zapatos".parse::<Rubro>(),
            Err(InvalidRubro("zapatos".to_owned()))
        );
        assert!("Darccuir".parse::<Rubro>().is_err());
        assert!("".parse::<Rubro>().is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        for rubro in Rubro::ALL {
            assert_eq!(rubro.to_string().parse::<Rubro>(), Ok(rubro));
        }
    }
}
