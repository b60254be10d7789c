//! Product repository: catalog listing, detail and similarity lookups.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use darccuir_core::{ProductId, Rubro, SubrubroId};

use super::{RepositoryError, contains_pattern};
use crate::models::product::LISTING_COVER_IMAGES;
use crate::models::{
    CatalogFilter, Product, ProductSummary, SimilarProduct, SimilarTier, SimilaritySeed,
};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductSummaryRow {
    id: i32,
    name: String,
    sku: String,
    price: Decimal,
    cover_images: Vec<String>,
    variants: serde_json::Value,
    stock: i32,
    description: String,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        let mut cover_images = row.cover_images;
        cover_images.truncate(LISTING_COVER_IMAGES);

        Self {
            id: ProductId::new(row.id),
            name: row.name,
            sku: row.sku,
            price: row.price,
            cover_images,
            variants: row.variants,
            stock: row.stock,
            description: row.description,
            description_snippet: None,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SimilarProductRow {
    id: i32,
    name: String,
    sku: String,
    price: Decimal,
    cover_images: Vec<String>,
    variants: serde_json::Value,
    stock: i32,
    subrubro_ids: Vec<i32>,
}

impl From<SimilarProductRow> for SimilarProduct {
    fn from(row: SimilarProductRow) -> Self {
        let mut cover_images = row.cover_images;
        cover_images.truncate(LISTING_COVER_IMAGES);

        Self {
            id: ProductId::new(row.id),
            name: row.name,
            sku: row.sku,
            price: row.price,
            cover_images,
            variants: row.variants,
            stock: row.stock,
            subrubro_ids: row.subrubro_ids.into_iter().map(SubrubroId::new).collect(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    sku: String,
    name: String,
    description: String,
    guia_talles: String,
    price: Decimal,
    price_wholesale: Option<Decimal>,
    cover_images: Vec<String>,
    variants: serde_json::Value,
    rubro: Rubro,
    subrubro_ids: Vec<i32>,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            sku: row.sku,
            name: row.name,
            description: row.description,
            guia_talles: row.guia_talles,
            price: row.price,
            price_wholesale: row.price_wholesale,
            cover_images: row.cover_images,
            variants: row.variants,
            rubro: row.rubro,
            subrubro_ids: row.subrubro_ids.into_iter().map(SubrubroId::new).collect(),
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SeedRow {
    id: i32,
    price: Decimal,
    subrubro_ids: Vec<i32>,
    rubro: Rubro,
}

// =============================================================================
// Query Building
// =============================================================================

/// Append the `WHERE` clause of a catalog listing.
fn push_catalog_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    qb.push(" WHERE rubro = ");
    qb.push_bind(filter.rubro);
    qb.push(" AND active");

    if let Some(subrubro) = filter.subrubro {
        qb.push(" AND ");
        qb.push_bind(subrubro);
        qb.push(" = ANY(subrubro_ids)");
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND price >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND price <= ");
        qb.push_bind(max);
    }

    if let Some(search) = &filter.search {
        let pattern = contains_pattern(&search.raw);

        qb.push(" AND (lower(sku) = lower(");
        qb.push_bind(search.raw.clone());
        qb.push(") OR sku ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR description ILIKE ");
        qb.push_bind(pattern);

        if search.is_multi_word() {
            qb.push(" OR (");
            let mut all_terms = qb.separated(" AND ");
            for term in &search.terms {
                all_terms.push("name ILIKE ");
                all_terms.push_bind_unseparated(contains_pattern(term));
            }
            qb.push(")");
        }

        qb.push(")");
    }
}

const SIMILAR_COLUMNS: &str = "SELECT id, name, sku, price, cover_images, variants, stock, \
                               subrubro_ids FROM shop.product";

/// Build the query for one similarity tier.
fn similar_query<'a>(
    seed: &SimilaritySeed,
    tier: &SimilarTier,
    limit: i64,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(SIMILAR_COLUMNS);
    qb.push(" WHERE id <> ");
    qb.push_bind(seed.id);
    qb.push(" AND rubro = ");
    qb.push_bind(seed.rubro);
    qb.push(" AND active");

    match tier {
        SimilarTier::SharedSubrubros(ids) => {
            qb.push(" AND subrubro_ids && ");
            qb.push_bind(ids.clone());
        }
        SimilarTier::PriceRange { min, max } => {
            qb.push(" AND price >= ");
            qb.push_bind(*min);
            qb.push(" AND price <= ");
            qb.push_bind(*max);
        }
        SimilarTier::SameRubro => {}
    }

    qb.push(" ORDER BY updated_at DESC, created_at DESC LIMIT ");
    qb.push_bind(limit);
    qb
}

/// Searches list recently edited products first, cheapest first among ties;
/// plain listings are newest first.
const fn catalog_order(filter: &CatalogFilter) -> &'static str {
    if filter.search.is_some() {
        " ORDER BY updated_at DESC, price ASC"
    } else {
        " ORDER BY created_at DESC"
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of the catalog plus the total number of matches.
    ///
    /// The page and count queries run concurrently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn search(
        &self,
        filter: &CatalogFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<ProductSummary>, i64), RepositoryError> {
        let mut page = QueryBuilder::new(
            "SELECT id, name, sku, price, cover_images, variants, stock, description \
             FROM shop.product",
        );
        push_catalog_filter(&mut page, filter);
        page.push(catalog_order(filter));
        page.push(" OFFSET ");
        page.push_bind(offset);
        page.push(" LIMIT ");
        page.push_bind(limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM shop.product");
        push_catalog_filter(&mut count, filter);

        let (rows, total) = tokio::try_join!(
            page.build_query_as::<ProductSummaryRow>()
                .fetch_all(self.pool),
            count.build_query_scalar::<i64>().fetch_one(self.pool),
        )?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// An active product of `rubro`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(
        &self,
        id: ProductId,
        rubro: Rubro,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, sku, name, description, guia_talles, price, price_wholesale,
                   cover_images, variants, rubro, subrubro_ids, stock, created_at, updated_at
            FROM shop.product
            WHERE id = $1 AND rubro = $2 AND active
            ",
        )
        .bind(id)
        .bind(rubro)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Whether the product exists and is on sale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_active(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let active = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shop.product WHERE id = $1 AND active)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(active)
    }

    /// Price, subrubros and rubro of a product, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn similarity_seed(
        &self,
        id: ProductId,
    ) -> Result<Option<SimilaritySeed>, RepositoryError> {
        let row = sqlx::query_as::<_, SeedRow>(
            "SELECT id, price, subrubro_ids, rubro FROM shop.product WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| SimilaritySeed {
            id: ProductId::new(r.id),
            price: r.price,
            subrubro_ids: r.subrubro_ids.into_iter().map(SubrubroId::new).collect(),
            rubro: r.rubro,
        }))
    }

    /// Up to `limit` products matching one similarity tier, most recently
    /// updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn similar(
        &self,
        seed: &SimilaritySeed,
        tier: &SimilarTier,
        limit: i64,
    ) -> Result<Vec<SimilarProduct>, RepositoryError> {
        let rows = similar_query(seed, tier, limit)
            .build_query_as::<SimilarProductRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchText;

    fn filter(search: Option<&str>) -> CatalogFilter {
        CatalogFilter {
            rubro: Rubro::Darccuir,
            subrubro: None,
            min_price: None,
            max_price: None,
            search: search.and_then(SearchText::parse),
        }
    }

    fn sql_for(filter: &CatalogFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM shop.product");
        push_catalog_filter(&mut qb, filter);
        qb.sql().to_owned()
    }

    #[test]
    fn test_base_filter() {
        assert_eq!(
            sql_for(&filter(None)),
            "SELECT 1 FROM shop.product WHERE rubro = $1 AND active"
        );
    }

    #[test]
    fn test_all_filters_bind_in_order() {
        let f = CatalogFilter {
            subrubro: Some(SubrubroId::new(4)),
            min_price: Some(Decimal::from(100)),
            max_price: Some(Decimal::from(900)),
            ..filter(None)
        };
        assert_eq!(
            sql_for(&f),
            "SELECT 1 FROM shop.product WHERE rubro = $1 AND active \
             AND $2 = ANY(subrubro_ids) AND price >= $3 AND price <= $4"
        );
    }

    #[test]
    fn test_single_word_search_has_no_all_terms_clause() {
        let sql = sql_for(&filter(Some("billetera")));
        assert!(sql.contains("lower(sku) = lower($2)"));
        assert!(sql.contains("description ILIKE $5"));
        assert!(!sql.contains("OR ("));
    }

    #[test]
    fn test_multi_word_search_requires_every_term_in_name() {
        let sql = sql_for(&filter(Some("bolso matero cuero")));
        assert!(sql.ends_with("OR (name ILIKE $6 AND name ILIKE $7 AND name ILIKE $8))"));
    }

    #[test]
    fn test_listing_orders_newest_first() {
        assert_eq!(catalog_order(&filter(None)), " ORDER BY created_at DESC");
    }

    #[test]
    fn test_search_orders_by_update_then_price() {
        assert_eq!(
            catalog_order(&filter(Some("mate"))),
            " ORDER BY updated_at DESC, price ASC"
        );
    }

    #[test]
    fn test_similar_query_tiers() {
        let seed = SimilaritySeed {
            id: ProductId::new(1),
            price: Decimal::from(1000),
            subrubro_ids: vec![SubrubroId::new(2)],
            rubro: Rubro::Yatay,
        };

        let shared = similar_query(&seed, &SimilarTier::SharedSubrubros(seed.subrubro_ids.clone()), 8);
        assert!(shared.sql().contains("subrubro_ids && $3"));

        let range = similar_query(
            &seed,
            &SimilarTier::PriceRange {
                min: Decimal::from(700),
                max: Decimal::from(1300),
            },
            8,
        );
        assert!(range.sql().contains("price >= $3 AND price <= $4"));

        let fallback = similar_query(&seed, &SimilarTier::SameRubro, 8);
        assert!(fallback.sql().ends_with("ORDER BY updated_at DESC, created_at DESC LIMIT $3"));
    }
}
