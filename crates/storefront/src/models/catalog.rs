//! Catalog query descriptions shared by the search and similarity services
//! and the product repository.

use rust_decimal::Decimal;

use darccuir_core::text::search_terms;
use darccuir_core::{ProductId, Rubro, SubrubroId};

/// A free-text catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
    /// The query as typed; matched against SKU, name and description.
    pub raw: String,
    /// Normalized words; all must appear in the name when there are several.
    pub terms: Vec<String>,
}

impl SearchText {
    /// Returns `None` for blank input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            raw: trimmed.to_owned(),
            terms: search_terms(trimmed),
        })
    }

    /// Whether the all-words name clause applies.
    #[must_use]
    pub fn is_multi_word(&self) -> bool {
        self.terms.len() > 1
    }
}

/// Resolved filters of a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub rubro: Rubro,
    pub subrubro: Option<SubrubroId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<SearchText>,
}

/// What the similarity search needs to know about the viewed product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilaritySeed {
    pub id: ProductId,
    pub price: Decimal,
    pub subrubro_ids: Vec<SubrubroId>,
    pub rubro: Rubro,
}

/// One level of the similar-products fallback.
///
/// Every tier implies "same rubro, active, not the seed product".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimilarTier {
    /// Shares at least one subrubro with the seed.
    SharedSubrubros(Vec<SubrubroId>),
    /// Price within the given inclusive range.
    PriceRange { min: Decimal, max: Decimal },
    /// Any product of the rubro.
    SameRubro,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_search_text_blank() {
        assert_eq!(SearchText::parse(""), None);
        assert_eq!(SearchText::parse("   "), None);
    }

    #[test]
    fn test_search_text_terms() {
        let search = SearchText::parse("  Bolsón Matero ").unwrap();
        assert_eq!(search.raw, "Bolsón Matero");
        assert_eq!(search.terms, vec!["bolson", "matero"]);
        assert!(search.is_multi_word());
        assert!(!SearchText::parse("DC-102").unwrap().is_multi_word());
    }
}
