//! Subrubro creation and deletion rules.

use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use darccuir_core::text::slugify;
use darccuir_core::tree::Subrubro;
use darccuir_core::{Rubro, SubrubroId};

use crate::db::{RepositoryError, SubrubroRepository};
use crate::models::NewSubrubro;

/// Errors that can occur while managing subrubros.
#[derive(Debug, Error)]
pub enum SubrubroError {
    #[error("name is required")]
    NameRequired,

    #[error("invalid rubro")]
    InvalidRubro,

    /// Name (and slug) reduce to nothing usable.
    #[error("slug is empty")]
    EmptySlug,

    #[error("parent {0} not found in rubro")]
    ParentNotFound(SubrubroId),

    #[error("slug already used in rubro")]
    DuplicateSlug,

    #[error("subrubro {0} has children")]
    HasChildren(SubrubroId),

    #[error("subrubro not found: {0}")]
    NotFound(SubrubroId),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Body of `POST /api/subrubros`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubrubroRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub rubro: String,
    #[serde(default)]
    pub parent_id: Option<SubrubroId>,
    #[serde(default)]
    pub order: i32,
}

/// Validate a request and derive its slug. The parent is checked separately.
fn prepare(request: SubrubroRequest) -> Result<NewSubrubro, SubrubroError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(SubrubroError::NameRequired);
    }
    let rubro: Rubro = request
        .rubro
        .parse()
        .map_err(|_| SubrubroError::InvalidRubro)?;

    let slug = request
        .slug
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(name));
    if slug.is_empty() {
        return Err(SubrubroError::EmptySlug);
    }

    Ok(NewSubrubro {
        name: name.to_owned(),
        slug,
        rubro,
        parent_id: request.parent_id,
        order: request.order,
    })
}

/// Subrubro service.
pub struct SubrubroService<'a> {
    subrubros: SubrubroRepository<'a>,
}

impl<'a> SubrubroService<'a> {
    /// Create a new subrubro service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            subrubros: SubrubroRepository::new(pool),
        }
    }

    /// Create a subrubro, deriving its slug from the name when none is given.
    ///
    /// # Errors
    ///
    /// Returns `SubrubroError::ParentNotFound` if the parent is missing or
    /// belongs to the other rubro.
    /// Returns `SubrubroError::DuplicateSlug` if `(slug, rubro)` is taken.
    pub async fn create(&self, request: SubrubroRequest) -> Result<Subrubro, SubrubroError> {
        let new = prepare(request)?;

        if let Some(parent_id) = new.parent_id {
            let parent = self.subrubros.get(parent_id).await?;
            if parent.is_none_or(|p| p.rubro != new.rubro) {
                return Err(SubrubroError::ParentNotFound(parent_id));
            }
        }

        let subrubro = self.subrubros.create(&new).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SubrubroError::DuplicateSlug,
            other => SubrubroError::Repository(other),
        })?;

        tracing::info!(
            subrubro_id = %subrubro.id,
            slug = %subrubro.slug,
            rubro = %subrubro.rubro,
            "Subrubro created"
        );
        Ok(subrubro)
    }

    /// Delete a subrubro without children.
    ///
    /// # Errors
    ///
    /// Returns `SubrubroError::HasChildren` if other subrubros hang under it.
    /// Returns `SubrubroError::NotFound` if it does not exist.
    pub async fn delete(&self, id: SubrubroId) -> Result<(), SubrubroError> {
        if self.subrubros.has_children(id).await? {
            return Err(SubrubroError::HasChildren(id));
        }

        let deleted = self.subrubros.delete(id).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => SubrubroError::HasChildren(id),
            other => SubrubroError::Repository(other),
        })?;
        if !deleted {
            return Err(SubrubroError::NotFound(id));
        }

        tracing::info!(subrubro_id = %id, "Subrubro deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(name: &str, slug: Option<&str>) -> SubrubroRequest {
        SubrubroRequest {
            name: name.to_owned(),
            slug: slug.map(str::to_owned),
            rubro: "yatay".to_owned(),
            parent_id: None,
            order: 2,
        }
    }

    #[test]
    fn test_slug_derived_from_name() {
        let new = prepare(request("  Mates y Bombillas ", None)).unwrap();
        assert_eq!(new.name, "Mates y Bombillas");
        assert_eq!(new.slug, "mates-y-bombillas");
        assert_eq!(new.rubro, Rubro::Yatay);
        assert_eq!(new.order, 2);
    }

    #[test]
    fn test_blank_slug_falls_back_to_name() {
        let new = prepare(request("Termos", Some("  "))).unwrap();
        assert_eq!(new.slug, "termos");
    }

    #[test]
    fn test_given_slug_is_normalized() {
        let new = prepare(request("Termos", Some("Térmicos Acero"))).unwrap();
        assert_eq!(new.slug, "termicos-acero");
    }

    #[test]
    fn test_rejects_missing_name_and_bad_rubro() {
        assert!(matches!(
            prepare(request(" ", None)),
            Err(SubrubroError::NameRequired)
        ));

        let mut req = request("Termos", None);
        req.rubro = "otros".to_owned();
        assert!(matches!(prepare(req), Err(SubrubroError::InvalidRubro)));
    }

    #[test]
    fn test_rejects_unsluggable_name() {
        assert!(matches!(
            prepare(request("¡¡!!", None)),
            Err(SubrubroError::EmptySlug)
        ));
    }
}
