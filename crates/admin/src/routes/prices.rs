//! Bulk price import handler.

use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::instrument;

use darccuir_core::PriceType;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::services::import::{ImportError, ImportReport, apply_prices, read_rows};
use crate::state::AppState;

/// Fields of the upload form.
#[derive(Debug, Default)]
struct PriceUpload {
    file: Option<Vec<u8>>,
    price_type: Option<String>,
}

impl PriceUpload {
    async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut upload = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("file") => upload.file = Some(field.bytes().await?.to_vec()),
                Some("priceType") => upload.price_type = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(upload)
    }

    /// The file contents and the price list they update.
    fn validate(self) -> std::result::Result<(Vec<u8>, PriceType), ImportError> {
        let file = self
            .file
            .filter(|f| !f.is_empty())
            .ok_or(ImportError::MissingFile)?;
        let price_type = self
            .price_type
            .as_deref()
            .map(str::trim)
            .and_then(|p| p.parse().ok())
            .ok_or(ImportError::InvalidPriceType)?;
        Ok((file, price_type))
    }
}

/// `POST /api/update-prices`: multipart `file` and `priceType`.
///
/// Rows are applied one by one; a failing row is reported and the rest
/// still go through.
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
pub async fn update_prices(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Json<ImportReport>> {
    let (file, price_type) = PriceUpload::read(multipart).await?.validate()?;
    tracing::info!(bytes = file.len(), %price_type, "Price import started");

    let rows = tokio::task::spawn_blocking(move || read_rows(file))
        .await
        .map_err(|e| AppError::failed("Error al procesar el archivo", e))??;

    let results = apply_prices(&ProductRepository::new(state.pool()), rows, price_type).await;

    Ok(Json(ImportReport {
        success: true,
        price_type,
        results,
    }))
}
