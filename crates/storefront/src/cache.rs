//! In-process cache for read-heavy catalog data.
//!
//! Entries expire after the configured TTL (5 minutes by default). Catalog
//! search is never cached here; its responses carry HTTP cache headers instead.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use darccuir_core::tree::SubrubroNode;
use darccuir_core::{ProductId, Rubro};

use crate::models::SimilarProduct;
use crate::services::similar::SimilarOptions;

const MAX_ENTRIES: u64 = 1000;

/// Cache key for catalog data.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    SubrubroTree(Rubro),
    Similar {
        product: ProductId,
        options: SimilarOptions,
    },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Tree(Arc<Vec<SubrubroNode>>),
    Similar(Arc<Vec<SimilarProduct>>),
}

/// Shared catalog cache. Cheap to clone.
#[derive(Clone)]
pub struct CatalogCache {
    inner: Cache<CacheKey, CacheValue>,
}

impl CatalogCache {
    /// Create a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Cached category tree of `rubro`.
    pub async fn subrubro_tree(&self, rubro: Rubro) -> Option<Arc<Vec<SubrubroNode>>> {
        match self.inner.get(&CacheKey::SubrubroTree(rubro)).await {
            Some(CacheValue::Tree(tree)) => {
                debug!(%rubro, "Cache hit for subrubro tree");
                Some(tree)
            }
            _ => None,
        }
    }

    /// Store the category tree of `rubro`.
    pub async fn insert_subrubro_tree(&self, rubro: Rubro, tree: Arc<Vec<SubrubroNode>>) {
        self.inner
            .insert(CacheKey::SubrubroTree(rubro), CacheValue::Tree(tree))
            .await;
    }

    /// Cached similar products for `product` computed with `options`.
    pub async fn similar(
        &self,
        product: ProductId,
        options: SimilarOptions,
    ) -> Option<Arc<Vec<SimilarProduct>>> {
        match self.inner.get(&CacheKey::Similar { product, options }).await {
            Some(CacheValue::Similar(products)) => {
                debug!(%product, "Cache hit for similar products");
                Some(products)
            }
            _ => None,
        }
    }

    /// Store similar products for `product` computed with `options`.
    pub async fn insert_similar(
        &self,
        product: ProductId,
        options: SimilarOptions,
        products: Arc<Vec<SimilarProduct>>,
    ) {
        self.inner
            .insert(
                CacheKey::Similar { product, options },
                CacheValue::Similar(products),
            )
            .await;
    }
}
