//! Product repository: back-office CRUD and price updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use darccuir_core::{PriceType, ProductId, Rubro, SubrubroId};

use super::{RepositoryError, contains_pattern, is_unique_violation};
use crate::models::{PricedProduct, Product, ProductDraft};

const PRODUCT_COLUMNS: &str = "id, sku, name, description, guia_talles, price, price_wholesale, \
                               cover_images, variants, rubro, subrubro_ids, active, stock, \
                               created_at, updated_at";

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
    active: bool,
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
            active: row.active,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PricedRow {
    id: i32,
    sku: String,
    name: String,
    price: Decimal,
    price_wholesale: Option<Decimal>,
}

/// Filters of the back-office product listing. Inactive products are included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListFilter {
    pub rubro: Option<Rubro>,
    pub query: Option<String>,
}

fn push_list_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductListFilter) {
    qb.push(" WHERE TRUE");

    if let Some(rubro) = filter.rubro {
        qb.push(" AND rubro = ");
        qb.push_bind(rubro);
    }
    if let Some(query) = &filter.query {
        let pattern = contains_pattern(query);
        qb.push(" AND (sku ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR name ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
}

fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if is_unique_violation(&e) {
        return RepositoryError::Conflict("sku already exists".to_owned());
    }
    RepositoryError::Database(e)
}

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

    /// One page of products, most recently updated first, plus the total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        filter: &ProductListFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let mut page = QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM shop.product"));
        push_list_filter(&mut page, filter);
        page.push(" ORDER BY updated_at DESC, id DESC OFFSET ");
        page.push_bind(offset);
        page.push(" LIMIT ");
        page.push_bind(limit);

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM shop.product");
        push_list_filter(&mut count, filter);

        let (rows, total) = tokio::try_join!(
            page.build_query_as::<ProductRow>().fetch_all(self.pool),
            count.build_query_scalar::<i64>().fetch_one(self.pool),
        )?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO shop.product
                (sku, name, description, guia_talles, price, price_wholesale,
                 cover_images, variants, rubro, subrubro_ids, active, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&draft.sku)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.guia_talles)
        .bind(draft.price)
        .bind(draft.price_wholesale)
        .bind(&draft.cover_images)
        .bind(&draft.variants)
        .bind(draft.rubro)
        .bind(&draft.subrubro_ids)
        .bind(draft.active)
        .bind(draft.stock)
        .fetch_one(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    /// Replace every editable column of a product.
    ///
    /// Returns `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new SKU is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE shop.product
            SET sku = $2, name = $3, description = $4, guia_talles = $5, price = $6,
                price_wholesale = $7, cover_images = $8, variants = $9, rubro = $10,
                subrubro_ids = $11, active = $12, stock = $13, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.sku)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.guia_talles)
        .bind(draft.price)
        .bind(draft.price_wholesale)
        .bind(&draft.cover_images)
        .bind(&draft.variants)
        .bind(draft.rubro)
        .bind(&draft.subrubro_ids)
        .bind(draft.active)
        .bind(draft.stock)
        .fetch_optional(self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(row.map(Into::into))
    }

    /// Delete a product. Cart lines holding it go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Look up a product's current prices by exact SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_sku(&self, sku: &str) -> Result<Option<PricedProduct>, RepositoryError> {
        let row = sqlx::query_as::<_, PricedRow>(
            "SELECT id, sku, name, price, price_wholesale FROM shop.product WHERE sku = $1",
        )
        .bind(sku)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| PricedProduct {
            id: ProductId::new(r.id),
            sku: r.sku,
            name: r.name,
            price: r.price,
            price_wholesale: r.price_wholesale,
        }))
    }

    /// Overwrite one price list of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product vanished.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_price(
        &self,
        id: ProductId,
        price_type: PriceType,
        price: Decimal,
    ) -> Result<(), RepositoryError> {
        let sql = match price_type {
            PriceType::Minorista => {
                "UPDATE shop.product SET price = $2, updated_at = now() WHERE id = $1"
            }
            PriceType::Mayorista => {
                "UPDATE shop.product SET price_wholesale = $2, updated_at = now() WHERE id = $1"
            }
        };

        let result = sqlx::query(sql)
            .bind(id)
            .bind(price)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
