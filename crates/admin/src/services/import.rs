//! Bulk price import from a supplier spreadsheet.
//!
//! The first worksheet holds a header block followed by one product per row
//! from row 6 on: code (SKU) in column A, description in B, price in C.
//! Rows missing any of the three are skipped. Each remaining row updates one
//! price list of the product with that SKU; a row that fails is reported and
//! the import carries on.

use std::future::Future;
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use darccuir_core::{PriceType, ProductId};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::PricedProduct;

/// Zero-based index of the first data row (row 6 in the spreadsheet).
pub const FIRST_DATA_ROW: u32 = 5;

const COL_CODE: u32 = 0;
const COL_DESCRIPTION: u32 = 1;
const COL_PRICE: u32 = 2;

/// Errors that abort a whole import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no file uploaded")]
    MissingFile,

    #[error("invalid price type")]
    InvalidPriceType,

    #[error("no valid rows")]
    NoValidRows,

    /// The upload is not a readable xlsx/xls/ods workbook.
    #[error("{0}")]
    Workbook(String),
}

/// One data row with all three columns filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub codigo: String,
    pub descripcion: String,
    /// `None` when column C is not a non-negative number.
    pub precio: Option<Decimal>,
}

/// A product whose price changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedPrice {
    pub sku: String,
    pub nombre: String,
    pub precio_anterior: Option<Decimal>,
    pub precio_nuevo: Decimal,
}

/// A row whose SKU matched no product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownSku {
    pub sku: String,
    pub descripcion: String,
}

/// A row that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub sku: String,
    pub razon: String,
}

/// Per-row outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResults {
    pub actualizados: Vec<UpdatedPrice>,
    pub no_encontrados: Vec<UnknownSku>,
    pub errores: Vec<RowError>,
    pub total: usize,
}

/// Response of `POST /api/update-prices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub price_type: PriceType,
    pub results: ImportResults,
}

/// Storage the prices are written to.
pub trait PriceStore: Sync {
    /// Current prices of the product with exactly this SKU.
    fn find_by_sku(
        &self,
        sku: &str,
    ) -> impl Future<Output = Result<Option<PricedProduct>, RepositoryError>> + Send;

    /// Overwrite one price list of a product.
    fn set_price(
        &self,
        id: ProductId,
        price_type: PriceType,
        price: Decimal,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

impl PriceStore for ProductRepository<'_> {
    async fn find_by_sku(&self, sku: &str) -> Result<Option<PricedProduct>, RepositoryError> {
        Self::find_by_sku(self, sku).await
    }

    async fn set_price(
        &self,
        id: ProductId,
        price_type: PriceType,
        price: Decimal,
    ) -> Result<(), RepositoryError> {
        Self::set_price(self, id, price_type, price).await
    }
}

/// Read the data rows of the first worksheet of an uploaded workbook.
///
/// # Errors
///
/// Returns `ImportError::Workbook` if the bytes are not a readable workbook.
/// Returns `ImportError::NoValidRows` if no row has all three columns.
pub fn read_rows(bytes: Vec<u8>) -> Result<Vec<ImportRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Workbook("el archivo no contiene hojas".to_owned()))?
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    let rows = rows_from_range(&range);
    if rows.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    Ok(rows)
}

/// Data rows of a worksheet, skipping the header block and incomplete rows.
#[must_use]
pub fn rows_from_range(range: &Range<Data>) -> Vec<ImportRow> {
    let Some((last_row, _)) = range.end() else {
        return Vec::new();
    };

    (FIRST_DATA_ROW..=last_row)
        .filter_map(|row| {
            let code = filled(range.get_value((row, COL_CODE)))?;
            let description = filled(range.get_value((row, COL_DESCRIPTION)))?;
            let price = filled(range.get_value((row, COL_PRICE)))?;

            Some(ImportRow {
                codigo: code.to_string().trim().to_owned(),
                descripcion: description.to_string(),
                precio: parse_price(price),
            })
        })
        .collect()
}

fn filled(cell: Option<&Data>) -> Option<&Data> {
    cell.filter(|c| match c {
        Data::Empty => false,
        Data::String(s) => !s.is_empty(),
        _ => true,
    })
}

/// A non-negative price rounded to cents, from a numeric or text cell.
fn parse_price(cell: &Data) -> Option<Decimal> {
    let price = match cell {
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::Float(f) => Decimal::try_from(*f).ok(),
        Data::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }?;

    (!price.is_sign_negative()).then(|| price.round_dp(2))
}

/// Apply every row to `store`, collecting the outcome of each.
pub async fn apply_prices<S: PriceStore>(
    store: &S,
    rows: Vec<ImportRow>,
    price_type: PriceType,
) -> ImportResults {
    let mut results = ImportResults {
        total: rows.len(),
        ..ImportResults::default()
    };

    for row in rows {
        let sku = row.codigo;
        let Some(precio_nuevo) = row.precio else {
            results.errores.push(RowError {
                sku,
                razon: "Precio inválido".to_owned(),
            });
            continue;
        };

        let product = match store.find_by_sku(&sku).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                results.no_encontrados.push(UnknownSku {
                    sku,
                    descripcion: row.descripcion,
                });
                continue;
            }
            Err(e) => {
                tracing::error!(error = %e, %sku, "Price import lookup failed");
                results.errores.push(row_failure(sku));
                continue;
            }
        };

        if let Err(e) = store.set_price(product.id, price_type, precio_nuevo).await {
            tracing::error!(error = %e, %sku, "Price import update failed");
            results.errores.push(row_failure(sku));
            continue;
        }

        results.actualizados.push(UpdatedPrice {
            sku,
            nombre: product.name,
            precio_anterior: match price_type {
                PriceType::Minorista => Some(product.price),
                PriceType::Mayorista => product.price_wholesale,
            },
            precio_nuevo,
        });
    }

    tracing::info!(
        %price_type,
        total = results.total,
        updated = results.actualizados.len(),
        not_found = results.no_encontrados.len(),
        failed = results.errores.len(),
        "Price import finished"
    );
    results
}

fn row_failure(sku: String) -> RowError {
    RowError {
        sku,
        razon: "Error al actualizar el precio".to_owned(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    fn sheet(rows: &[(u32, Data, Data, Data)]) -> Range<Data> {
        let last = rows.iter().map(|r| r.0).max().unwrap_or(FIRST_DATA_ROW);
        let mut range = Range::new((0, 0), (last, 2));
        range.set_value((0, 0), Data::String("LISTA DE PRECIOS".to_owned()));
        range.set_value((4, 0), Data::String("Código".to_owned()));
        range.set_value((4, 2), Data::String("Precio".to_owned()));
        for (row, code, description, price) in rows {
            range.set_value((*row, 0), code.clone());
            range.set_value((*row, 1), description.clone());
            range.set_value((*row, 2), price.clone());
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_owned())
    }

    #[test]
    fn test_rows_skip_header_and_incomplete() {
        let range = sheet(&[
            (5, text(" CIN-001 "), text("Cinto"), Data::Float(1500.5)),
            (6, text("CIN-002"), Data::Empty, Data::Float(10.0)),
            (7, text(""), text("Sin código"), Data::Int(3)),
            (8, Data::Float(1001.0), text("Mate"), text("2300")),
        ]);

        let rows = rows_from_range(&range);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].codigo, "CIN-001");
        assert_eq!(rows[0].precio, Some(Decimal::new(150_050, 2)));
        assert_eq!(rows[1].codigo, "1001");
        assert_eq!(rows[1].precio, Some(Decimal::from(2300)));
    }

    #[test]
    fn test_header_only_sheet_has_no_rows() {
        assert!(rows_from_range(&sheet(&[])).is_empty());
        assert!(rows_from_range(&Range::<Data>::empty()).is_empty());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(&Data::Int(1200)), Some(Decimal::from(1200)));
        assert_eq!(parse_price(&text(" 99.999 ")), Some(Decimal::new(10_000, 2)));
        assert_eq!(parse_price(&text("consultar")), None);
        assert_eq!(parse_price(&Data::Float(-1.0)), None);
        assert_eq!(parse_price(&Data::Bool(true)), None);
    }

    #[test]
    fn test_garbage_upload_is_unreadable() {
        let result = read_rows(b"sku,precio\nCIN-001,100\n".to_vec());
        assert!(matches!(result, Err(ImportError::Workbook(_))));
    }

    struct MemoryStore {
        products: HashMap<String, PricedProduct>,
        broken_sku: Option<String>,
        writes: Mutex<Vec<(ProductId, PriceType, Decimal)>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            let product = PricedProduct {
                id: ProductId::new(7),
                sku: "CIN-001".to_owned(),
                name: "Cinto trenzado".to_owned(),
                price: Decimal::from(1000),
                price_wholesale: None,
            };
            Self {
                products: HashMap::from([(product.sku.clone(), product)]),
                broken_sku: None,
                writes: Mutex::new(Vec::new()),
            }
        }
    }

    impl PriceStore for MemoryStore {
        async fn find_by_sku(&self, sku: &str) -> Result<Option<PricedProduct>, RepositoryError> {
            if self.broken_sku.as_deref() == Some(sku) {
                return Err(RepositoryError::DataCorruption("bad row".to_owned()));
            }
            Ok(self.products.get(sku).cloned())
        }

        async fn set_price(
            &self,
            id: ProductId,
            price_type: PriceType,
            price: Decimal,
        ) -> Result<(), RepositoryError> {
            self.writes.lock().unwrap().push((id, price_type, price));
            Ok(())
        }
    }

    fn row(code: &str, price: Option<i64>) -> ImportRow {
        ImportRow {
            codigo: code.to_owned(),
            descripcion: format!("Artículo {code}"),
            precio: price.map(Decimal::from),
        }
    }

    #[tokio::test]
    async fn test_apply_sorts_rows_into_outcomes() {
        let store = MemoryStore::new();
        let rows = vec![
            row("CIN-001", Some(1200)),
            row("NO-EXISTE", Some(50)),
            row("CIN-001", None),
        ];

        let results = apply_prices(&store, rows, PriceType::Minorista).await;

        assert_eq!(results.total, 3);
        assert_eq!(
            results.actualizados,
            vec![UpdatedPrice {
                sku: "CIN-001".to_owned(),
                nombre: "Cinto trenzado".to_owned(),
                precio_anterior: Some(Decimal::from(1000)),
                precio_nuevo: Decimal::from(1200),
            }]
        );
        assert_eq!(results.no_encontrados[0].descripcion, "Artículo NO-EXISTE");
        assert_eq!(results.errores[0].razon, "Precio inválido");
        assert_eq!(
            *store.writes.lock().unwrap(),
            vec![(ProductId::new(7), PriceType::Minorista, Decimal::from(1200))]
        );
    }

    #[tokio::test]
    async fn test_wholesale_reports_previous_wholesale_price() {
        let store = MemoryStore::new();
        let results = apply_prices(&store, vec![row("CIN-001", Some(800))], PriceType::Mayorista).await;

        assert_eq!(results.actualizados[0].precio_anterior, None);
        assert_eq!(store.writes.lock().unwrap()[0].1, PriceType::Mayorista);
    }

    #[tokio::test]
    async fn test_row_failure_does_not_stop_import() {
        let mut store = MemoryStore::new();
        store.broken_sku = Some("ROTO".to_owned());
        let rows = vec![row("ROTO", Some(10)), row("CIN-001", Some(1100))];

        let results = apply_prices(&store, rows, PriceType::Minorista).await;

        assert_eq!(results.errores.len(), 1);
        assert_eq!(results.errores[0].sku, "ROTO");
        assert_eq!(results.actualizados.len(), 1);
    }

    #[test]
    fn test_report_shape() {
        let report = ImportReport {
            success: true,
            price_type: PriceType::Mayorista,
            results: ImportResults::default(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["priceType"], "mayorista");
        assert_eq!(json["results"]["noEncontrados"], serde_json::json!([]));
        assert_eq!(json["results"]["total"], 0);
    }

    struct FinishedCounter(std::sync::Arc<Mutex<usize>>);

    struct MessageVisitor(Option<String>);

    impl tracing::field::Visit for MessageVisitor {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FinishedCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let mut visitor = MessageVisitor(None);
            event.record(&mut visitor);
            if visitor.0.as_deref() == Some("Price import finished") {
                *self.0.lock().unwrap() += 1;
            }
        }
    }

    #[tokio::test]
    async fn test_import_summary_logged_once() {
        use tracing_subscriber::layer::SubscriberExt;

        let count = std::sync::Arc::new(Mutex::new(0));
        let subscriber =
            tracing_subscriber::registry().with(FinishedCounter(std::sync::Arc::clone(&count)));
        let _guard = tracing::subscriber::set_default(subscriber);

        let store = MemoryStore::new();
        apply_prices(&store, vec![row("CIN-001", Some(1300))], PriceType::Minorista).await;

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
