//! Subrubro repository: category management.

use sqlx::PgPool;

use darccuir_core::tree::{Subrubro, SubrubroSource};
use darccuir_core::{Rubro, SubrubroId};

use super::{RepositoryError, is_foreign_key_violation, is_unique_violation};
use crate::models::{NewSubrubro, SubrubroListItem};

const SUBRUBRO_COLUMNS: &str = r#"id, name, slug, rubro, parent_id, "order", active"#;

#[derive(Debug, sqlx::FromRow)]
struct SubrubroRow {
    id: i32,
    name: String,
    slug: String,
    rubro: Rubro,
    parent_id: Option<i32>,
    order: i32,
    active: bool,
}

impl From<SubrubroRow> for Subrubro {
    fn from(row: SubrubroRow) -> Self {
        Self {
            id: SubrubroId::new(row.id),
            name: row.name,
            slug: row.slug,
            rubro: row.rubro,
            parent_id: row.parent_id.map(SubrubroId::new),
            order: row.order,
            active: row.active,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListRow {
    #[sqlx(flatten)]
    subrubro: SubrubroRow,
    parent_name: Option<String>,
}

/// Repository for subrubro database operations.
pub struct SubrubroRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubrubroRepository<'a> {
    /// Create a new subrubro repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every subrubro of both rubros, with its parent's name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<SubrubroListItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListRow>(
            r#"
            SELECT s.id, s.name, s.slug, s.rubro, s.parent_id, s."order", s.active,
                   p.name AS parent_name
            FROM shop.subrubro s
            LEFT JOIN shop.subrubro p ON p.id = s.parent_id
            ORDER BY s.rubro ASC, s."order" ASC, s.id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SubrubroListItem {
                subrubro: r.subrubro.into(),
                parent_name: r.parent_name,
            })
            .collect())
    }

    /// Get a subrubro by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SubrubroId) -> Result<Option<Subrubro>, RepositoryError> {
        let row = sqlx::query_as::<_, SubrubroRow>(&format!(
            "SELECT {SUBRUBRO_COLUMNS} FROM shop.subrubro WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Insert a subrubro.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken within the rubro.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewSubrubro) -> Result<Subrubro, RepositoryError> {
        let row = sqlx::query_as::<_, SubrubroRow>(&format!(
            r#"
            INSERT INTO shop.subrubro (name, slug, rubro, parent_id, "order")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUBRUBRO_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.slug)
        .bind(new.rubro)
        .bind(new.parent_id)
        .bind(new.order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return RepositoryError::Conflict("slug already exists in rubro".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Whether any subrubro hangs under `id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_children(&self, id: SubrubroId) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shop.subrubro WHERE parent_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// How many of `ids` exist within `rubro`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_in_rubro(
        &self,
        ids: &[SubrubroId],
        rubro: Rubro,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shop.subrubro WHERE id = ANY($1) AND rubro = $2",
        )
        .bind(ids)
        .bind(rubro)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a leaf subrubro and drop it from every product's `subrubro_ids`.
    ///
    /// Both happen in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a child appeared meanwhile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: SubrubroId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let detached = sqlx::query(
            r"
            UPDATE shop.product
            SET subrubro_ids = array_remove(subrubro_ids, $1), updated_at = now()
            WHERE $1 = ANY(subrubro_ids)
            ",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM shop.subrubro WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return RepositoryError::Conflict("subrubro has children".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        tx.commit().await?;

        tracing::debug!(
            subrubro_id = %id,
            products = detached.rows_affected(),
            "Detached subrubro from products"
        );
        Ok(deleted.rows_affected() > 0)
    }
}

impl SubrubroSource for SubrubroRepository<'_> {
    type Error = RepositoryError;

    async fn children(
        &self,
        parent: Option<SubrubroId>,
        rubro: Rubro,
    ) -> Result<Vec<Subrubro>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubrubroRow>(&format!(
            r#"
            SELECT {SUBRUBRO_COLUMNS}
            FROM shop.subrubro
            WHERE rubro = $1 AND active AND parent_id IS NOT DISTINCT FROM $2
            ORDER BY "order" ASC, id ASC
            "#
        ))
        .bind(rubro)
        .bind(parent)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
