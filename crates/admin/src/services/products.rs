//! Product validation and persistence.
//!
//! The input mirrors the storefront's product document: every field but
//! `sku`, `name`, `price` and `rubro` has a default.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use url::Url;

use darccuir_core::{ProductId, Rubro, SubrubroId};

use crate::db::{ProductRepository, RepositoryError, SubrubroRepository};
use crate::models::{Product, ProductDraft};

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Errors that can occur while saving a product.
#[derive(Debug, Error)]
pub enum ProductError {
    /// One or more fields failed validation.
    #[error("invalid product: {0:?}")]
    Invalid(Vec<FieldError>),

    /// No product with this id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Another product already uses the SKU.
    #[error("duplicate sku")]
    DuplicateSku,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub price_wholesale: Option<Decimal>,
    pub cover_images: Option<Vec<String>>,
    pub variants: Option<serde_json::Value>,
    pub description: Option<String>,
    pub guia_talles: Option<String>,
    pub rubro: Option<String>,
    pub subrubros: Option<Vec<SubrubroId>>,
    pub active: Option<bool>,
    pub stock: Option<i64>,
}

/// Check `input` and fill in defaults. Every failing field is reported.
///
/// # Errors
///
/// Returns the list of rejected fields.
pub fn validate(input: ProductInput) -> Result<ProductDraft, Vec<FieldError>> {
    let mut errors = Vec::new();

    let sku = input.sku.as_deref().map(str::trim).unwrap_or_default();
    if sku.is_empty() {
        errors.push(FieldError::new("sku", "SKU requerido"));
    }

    let name = input.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Nombre requerido"));
    }

    let price = match input.price {
        Some(p) if !p.is_sign_negative() => p,
        _ => {
            errors.push(FieldError::new("price", "Precio inválido"));
            Decimal::ZERO
        }
    };

    if input.price_wholesale.is_some_and(|p| p.is_sign_negative()) {
        errors.push(FieldError::new("priceWholesale", "Precio mayorista inválido"));
    }

    let cover_images = input.cover_images.unwrap_or_default();
    if !cover_images.iter().all(|u| is_http_url(u)) {
        errors.push(FieldError::new("coverImages", "URL de imagen inválida"));
    }

    let rubro = match input.rubro.as_deref() {
        None => {
            errors.push(FieldError::new("rubro", "Rubro requerido"));
            None
        }
        Some(raw) => raw.parse::<Rubro>().map_or_else(
            |_| {
                errors.push(FieldError::new("rubro", "Rubro inválido"));
                None
            },
            Some,
        ),
    };

    let stock = match input.stock.map(i32::try_from) {
        None => 0,
        Some(Ok(s)) if s >= 0 => s,
        Some(_) => {
            errors.push(FieldError::new("stock", "Stock inválido"));
            0
        }
    };

    let mut subrubro_ids = input.subrubros.unwrap_or_default();
    subrubro_ids.sort_unstable();
    subrubro_ids.dedup();

    match rubro {
        Some(rubro) if errors.is_empty() => Ok(ProductDraft {
            sku: sku.to_owned(),
            name: name.to_owned(),
            description: input.description.unwrap_or_default(),
            guia_talles: input.guia_talles.unwrap_or_default(),
            price,
            price_wholesale: input.price_wholesale,
            cover_images,
            variants: input
                .variants
                .filter(|v| !v.is_null())
                .unwrap_or_else(|| serde_json::Value::Array(Vec::new())),
            rubro,
            subrubro_ids,
            active: input.active.unwrap_or(true),
            stock,
        }),
        _ => Err(errors),
    }
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw)
        .is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

/// Product service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
    subrubros: SubrubroRepository<'a>,
}

impl<'a> ProductService<'a> {
    /// Create a new product service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            subrubros: SubrubroRepository::new(pool),
        }
    }

    /// Validate and insert a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Invalid` if validation fails.
    /// Returns `ProductError::DuplicateSku` if the SKU is taken.
    pub async fn create(&self, input: ProductInput) -> Result<Product, ProductError> {
        let draft = self.checked(input).await?;
        let product = self.products.create(&draft).await.map_err(duplicate_sku)?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    /// Validate and replace a product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Invalid` if validation fails.
    /// Returns `ProductError::NotFound` if the product does not exist.
    /// Returns `ProductError::DuplicateSku` if the new SKU is taken.
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, ProductError> {
        let draft = self.checked(input).await?;
        let product = self
            .products
            .update(id, &draft)
            .await
            .map_err(duplicate_sku)?
            .ok_or(ProductError::NotFound(id))?;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product updated");
        Ok(product)
    }

    /// Validation plus the check that every subrubro belongs to the product's rubro.
    async fn checked(&self, input: ProductInput) -> Result<ProductDraft, ProductError> {
        let draft = validate(input).map_err(ProductError::Invalid)?;

        if !draft.subrubro_ids.is_empty() {
            let found = self
                .subrubros
                .count_in_rubro(&draft.subrubro_ids, draft.rubro)
                .await?;
            if usize::try_from(found).ok() != Some(draft.subrubro_ids.len()) {
                return Err(ProductError::Invalid(vec![FieldError::new(
                    "subrubros",
                    "Subrubro inválido",
                )]));
            }
        }

        Ok(draft)
    }
}

fn duplicate_sku(e: RepositoryError) -> ProductError {
    match e {
        RepositoryError::Conflict(_) => ProductError::DuplicateSku,
        other => ProductError::Repository(other),
    }
}
