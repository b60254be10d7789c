//! Subrubro repository.

use sqlx::PgPool;

use darccuir_core::tree::{Subrubro, SubrubroSource};
use darccuir_core::{Rubro, SubrubroId};

use super::RepositoryError;

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

/// Repository for subrubro lookups.
pub struct SubrubroRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubrubroRepository<'a> {
    /// Create a new subrubro repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a slug to a subrubro id within `rubro`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_id_by_slug(
        &self,
        slug: &str,
        rubro: Rubro,
    ) -> Result<Option<SubrubroId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, i32>(
            "SELECT id FROM shop.subrubro WHERE slug = $1 AND rubro = $2",
        )
        .bind(slug)
        .bind(rubro)
        .fetch_optional(self.pool)
        .await?;

        Ok(id.map(SubrubroId::new))
    }
}

impl SubrubroSource for SubrubroRepository<'_> {
    type Error = RepositoryError;

    async fn children(
        &self,
        parent: Option<SubrubroId>,
        rubro: Rubro,
    ) -> Result<Vec<Subrubro>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubrubroRow>(
            r#"
            SELECT id, name, slug, rubro, parent_id, "order", active
            FROM shop.subrubro
            WHERE rubro = $1 AND active AND parent_id IS NOT DISTINCT FROM $2
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .bind(rubro)
        .bind(parent)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
