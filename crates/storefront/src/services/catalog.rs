//! Catalog search.
//!
//! Query parameters are parsed leniently: a value that does not parse is
//! treated as absent rather than rejected.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use darccuir_core::paging::{Pagination, Paging};
use darccuir_core::text::{SNIPPET_MAX_LEN, snippet};
use darccuir_core::{Rubro, SubrubroId};

use crate::db::{ProductRepository, RepositoryError, SubrubroRepository};
use crate::models::{CatalogFilter, ProductSummary, SearchText};

/// `Cache-Control` for listings without a text query.
pub const CACHE_CONTROL_LISTING: &str = "public, s-maxage=300, stale-while-revalidate=600";

/// `Cache-Control` for text searches.
pub const CACHE_CONTROL_SEARCH: &str = "private, no-cache";

/// Raw query string of `GET /api/products/{rubro}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub subrubro: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub q: Option<String>,
}

impl CatalogQuery {
    /// The text query, if present and non-blank.
    #[must_use]
    pub fn search(&self) -> Option<SearchText> {
        self.q.as_deref().and_then(SearchText::parse)
    }
}

/// How the `subrubro` parameter identifies a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubrubroParam {
    Id(SubrubroId),
    Slug(String),
}

impl SubrubroParam {
    /// Numeric values are ids, anything else non-blank is a slug.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
        Some(
            SubrubroId::from_str(raw)
                .map_or_else(|_| Self::Slug(raw.to_owned()), Self::Id),
        )
    }
}

/// Echo of the text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    pub query: String,
    pub results_found: bool,
}

/// Response of `GET /api/products/{rubro}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub productos: Vec<ProductSummary>,
    pub pagination: Pagination,
    /// `null` when not searching.
    pub search_info: Option<SearchInfo>,
}

impl CatalogPage {
    /// Whether this page answers a text search.
    #[must_use]
    pub const fn is_search(&self) -> bool {
        self.search_info.is_some()
    }

    /// `Cache-Control` value for this page.
    #[must_use]
    pub const fn cache_control(&self) -> &'static str {
        if self.is_search() {
            CACHE_CONTROL_SEARCH
        } else {
            CACHE_CONTROL_LISTING
        }
    }
}

/// Run a catalog listing for `rubro`.
///
/// An unknown subrubro slug yields an empty page without querying products.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn search_catalog(
    pool: &PgPool,
    rubro: Rubro,
    query: &CatalogQuery,
) -> Result<CatalogPage, RepositoryError> {
    let paging = Paging::parse(query.page.as_deref(), query.limit.as_deref());
    let search = query.search();

    let subrubro = match SubrubroParam::parse(query.subrubro.as_deref()) {
        None => None,
        Some(SubrubroParam::Id(id)) => Some(id),
        Some(SubrubroParam::Slug(slug)) => {
            let found = SubrubroRepository::new(pool)
                .find_id_by_slug(&slug, rubro)
                .await?;
            let Some(id) = found else {
                tracing::debug!(%rubro, %slug, "Unknown subrubro slug");
                return Ok(empty_page(paging));
            };
            Some(id)
        }
    };

    let filter = CatalogFilter {
        rubro,
        subrubro,
        min_price: parse_price(query.min_price.as_deref()),
        max_price: parse_price(query.max_price.as_deref()),
        search,
    };

    let (mut productos, total) = ProductRepository::new(pool)
        .search(&filter, paging.offset(), paging.limit)
        .await?;

    if let Some(search) = &filter.search {
        attach_snippets(&mut productos, &search.raw);
    }

    Ok(CatalogPage {
        productos,
        pagination: Pagination::new(paging, total),
        search_info: filter.search.map(|s| SearchInfo {
            query: s.raw,
            results_found: total > 0,
        }),
    })
}

/// Carries no `searchInfo` even when a search was given, so the page is
/// cached like a plain listing.
fn empty_page(paging: Paging) -> CatalogPage {
    CatalogPage {
        productos: Vec::new(),
        pagination: Pagination::new(paging, 0),
        search_info: None,
    }
}

fn parse_price(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|p| Decimal::from_str(p.trim()).ok())
}

/// Add a description excerpt around the query to every product that has a
/// description.
fn attach_snippets(productos: &mut [ProductSummary], query: &str) {
    for product in productos.iter_mut() {
        if !product.description.is_empty() {
            product.description_snippet =
                Some(snippet(&product.description, query, SNIPPET_MAX_LEN));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use darccuir_core::ProductId;

    use super::*;

    #[test]
    fn test_subrubro_param() {
        assert_eq!(SubrubroParam::parse(None), None);
        assert_eq!(SubrubroParam::parse(Some("  ")), None);
        assert_eq!(
            SubrubroParam::parse(Some("12")),
            Some(SubrubroParam::Id(SubrubroId::new(12)))
        );
        assert_eq!(
            SubrubroParam::parse(Some("cintos")),
            Some(SubrubroParam::Slug("cintos".to_owned()))
        );
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(Some("1500.50")), Some(Decimal::new(150_050, 2)));
        assert_eq!(parse_price(Some("barato")), None);
        assert_eq!(parse_price(None), None);
    }

    #[test]
    fn test_empty_page_shape() {
        let page = empty_page(Paging { page: 2, limit: 10 });
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productos": [],
                "pagination": {
                    "page": 2,
                    "limit": 10,
                    "total": 0,
                    "totalPages": 0,
                    "hasMore": false
                },
                "searchInfo": null
            })
        );
        assert_eq!(page.cache_control(), CACHE_CONTROL_LISTING);
    }

    #[test]
    fn test_search_page_is_private() {
        let page = CatalogPage {
            search_info: Some(SearchInfo {
                query: "mate".to_owned(),
                results_found: false,
            }),
            ..empty_page(Paging::parse(None, None))
        };
        assert_eq!(page.cache_control(), CACHE_CONTROL_SEARCH);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["searchInfo"]["query"], "mate");
        assert_eq!(json["searchInfo"]["resultsFound"], false);
    }

    #[test]
    fn test_snippets_only_for_descriptions() {
        let mut productos = vec![
            ProductSummary {
                id: ProductId::new(1),
                name: "Mate".to_owned(),
                sku: "M-1".to_owned(),
                price: Decimal::from(100),
                cover_images: Vec::new(),
                variants: serde_json::json!([]),
                stock: 1,
                description: "Mate de calabaza forrado en cuero".to_owned(),
                description_snippet: None,
            },
            ProductSummary {
                id: ProductId::new(2),
                name: "Bombilla".to_owned(),
                sku: "B-1".to_owned(),
                price: Decimal::from(50),
                cover_images: Vec::new(),
                variants: serde_json::json!([]),
                stock: 1,
                description: String::new(),
                description_snippet: None,
            },
        ];

        attach_snippets(&mut productos, "cuero");

        assert_eq!(
            productos[0].description_snippet.as_deref(),
            Some("Mate de calabaza forrado en cuero")
        );
        assert_eq!(productos[1].description_snippet, None);
    }
}
