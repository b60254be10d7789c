//! Subrubro management types.

use serde::Serialize;

use darccuir_core::tree::Subrubro;
use darccuir_core::{Rubro, SubrubroId};

/// A subrubro in the flat management listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubrubroListItem {
    #[serde(flatten)]
    pub subrubro: Subrubro,
    pub parent_name: Option<String>,
}

/// Validated fields for inserting a subrubro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubrubro {
    pub name: String,
    pub slug: String,
    pub rubro: Rubro,
    pub parent_id: Option<SubrubroId>,
    pub order: i32,
}
