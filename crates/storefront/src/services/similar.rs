//! Similar products.
//!
//! Candidates are gathered in tiers, from closest to loosest match: products
//! sharing a subrubro, products in a ±30% price band, then anything else in
//! the same rubro. Each tier only fills the slots the previous ones left.

use rust_decimal::Decimal;

use darccuir_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::{SimilarProduct, SimilarTier, SimilaritySeed};

/// Default number of similar products.
pub const DEFAULT_LIMIT: u32 = 8;

/// Largest number of similar products a caller may ask for.
pub const MAX_LIMIT: u32 = 50;

/// Knobs for [`similar_products`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimilarOptions {
    pub limit: u32,
    pub include_subrubros: bool,
    pub include_price_range: bool,
}

impl Default for SimilarOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            include_subrubros: true,
            include_price_range: true,
        }
    }
}

/// Storage the tiers are fetched from.
pub trait SimilarSource: Sync {
    /// Price, subrubros and rubro of `id`, if the product exists.
    fn seed(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<SimilaritySeed>, RepositoryError>> + Send;

    /// Up to `limit` products of one tier, most recently updated first.
    fn fetch(
        &self,
        seed: &SimilaritySeed,
        tier: &SimilarTier,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<SimilarProduct>, RepositoryError>> + Send;
}

impl SimilarSource for ProductRepository<'_> {
    async fn seed(&self, id: ProductId) -> Result<Option<SimilaritySeed>, RepositoryError> {
        self.similarity_seed(id).await
    }

    async fn fetch(
        &self,
        seed: &SimilaritySeed,
        tier: &SimilarTier,
        limit: i64,
    ) -> Result<Vec<SimilarProduct>, RepositoryError> {
        self.similar(seed, tier, limit).await
    }
}

/// Tiers to try for `seed`, in order.
#[must_use]
pub fn plan_tiers(seed: &SimilaritySeed, options: SimilarOptions) -> Vec<SimilarTier> {
    let mut tiers = Vec::with_capacity(3);

    if options.include_subrubros && !seed.subrubro_ids.is_empty() {
        tiers.push(SimilarTier::SharedSubrubros(seed.subrubro_ids.clone()));
    }
    if options.include_price_range {
        tiers.push(SimilarTier::PriceRange {
            min: seed.price * Decimal::new(7, 1),
            max: seed.price * Decimal::new(13, 1),
        });
    }
    tiers.push(SimilarTier::SameRubro);

    tiers
}

/// Products similar to `product`, at most `options.limit` of them.
///
/// Never fails: errors are logged and yield an empty list.
pub async fn similar_products<S: SimilarSource>(
    source: &S,
    product: ProductId,
    options: SimilarOptions,
) -> Vec<SimilarProduct> {
    match collect(source, product, options).await {
        Ok(products) => products,
        Err(e) => {
            tracing::error!(error = %e, %product, "Failed to load similar products");
            Vec::new()
        }
    }
}

async fn collect<S: SimilarSource>(
    source: &S,
    product: ProductId,
    options: SimilarOptions,
) -> Result<Vec<SimilarProduct>, RepositoryError> {
    let limit = options.limit as usize;
    let Some(seed) = source.seed(product).await? else {
        return Ok(Vec::new());
    };

    let mut collected: Vec<SimilarProduct> = Vec::with_capacity(limit);
    for tier in plan_tiers(&seed, options) {
        if collected.len() >= limit {
            break;
        }

        let wanted = i64::try_from(limit - collected.len()).unwrap_or(i64::MAX);
        for candidate in source.fetch(&seed, &tier, wanted).await? {
            if !collected.iter().any(|p| p.id == candidate.id) {
                collected.push(candidate);
            }
        }
    }

    collected.truncate(limit);
    Ok(collected)
}
