//! Subrubro category tree.
//!
//! The tree is loaded one level at a time: every node triggers one lookup for
//! its children. Storage is abstracted behind [`SubrubroSource`] so both
//! binaries can share the loader with their own repositories.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Rubro, SubrubroId};

/// A single subrubro (sub-category) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subrubro {
    pub id: SubrubroId,
    pub name: String,
    pub slug: String,
    pub rubro: Rubro,
    pub parent_id: Option<SubrubroId>,
    pub order: i32,
    pub active: bool,
}

/// A subrubro together with its active descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubrubroNode {
    #[serde(flatten)]
    pub subrubro: Subrubro,
    pub children: Vec<Self>,
}

impl SubrubroNode {
    /// Number of nodes in this subtree, including itself.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Storage that can list the active children of a subrubro.
pub trait SubrubroSource: Sync {
    type Error: Send;

    /// Active subrubros of `rubro` whose parent is `parent` (`None` for the
    /// top level), ordered by `order` ascending.
    fn children(
        &self,
        parent: Option<SubrubroId>,
        rubro: Rubro,
    ) -> impl Future<Output = Result<Vec<Subrubro>, Self::Error>> + Send;
}

type TreeFuture<'a, E> = Pin<Box<dyn Future<Output = Result<Vec<SubrubroNode>, E>> + Send + 'a>>;

/// Load the active subtree under `parent` for `rubro`.
///
/// # Errors
///
/// Returns the first error reported by `source`.
pub fn load_subrubro_tree<S: SubrubroSource>(
    source: &S,
    parent: Option<SubrubroId>,
    rubro: Rubro,
) -> TreeFuture<'_, S::Error> {
    Box::pin(async move {
        let level = source.children(parent, rubro).await?;
        let mut nodes = Vec::with_capacity(level.len());
        for subrubro in level {
            let children = load_subrubro_tree(source, Some(subrubro.id), rubro).await?;
            nodes.push(SubrubroNode { subrubro, children });
        }
        Ok(nodes)
    })
}
