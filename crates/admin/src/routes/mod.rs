//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Health check
//! GET    /health/ready             - Readiness check (database)
//!
//! # Auth
//! POST   /auth/login               - Login (admin role only)
//! POST   /auth/logout              - Logout
//!
//! # Products
//! GET    /api/products             - List (rubro, q, page, limit)
//! POST   /api/products             - Create
//! GET    /api/products/{id}        - Detail
//! PUT    /api/products/{id}        - Replace
//! DELETE /api/products/{id}        - Delete
//!
//! # Subrubros
//! GET    /api/subrubros            - Flat list with parent names
//! POST   /api/subrubros            - Create
//! GET    /api/subrubros/tree       - Tree of one rubro
//! DELETE /api/subrubros/{id}       - Delete (no children)
//!
//! # Prices
//! POST   /api/update-prices        - Bulk price import from a spreadsheet
//!
//! # Users
//! GET    /api/users                - List
//! POST   /api/users                - Create
//! ```
//!
//! Every `/api` handler takes [`RequireAdmin`](crate::middleware::RequireAdmin).

pub mod auth;
pub mod prices;
pub mod products;
pub mod subrubros;
pub mod users;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

use darccuir_core::Rubro;

use crate::error::AppError;
use crate::state::AppState;

/// Parse an optional `rubro` query parameter. Blank means no filter.
pub(crate) fn parse_rubro(raw: Option<&str>) -> Result<Option<Rubro>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest("Rubro inválido".to_owned())),
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the subrubro routes router.
pub fn subrubro_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(subrubros::index).post(subrubros::create))
        .route("/tree", get(subrubros::tree))
        .route("/{id}", delete(subrubros::destroy))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(users::index).post(users::create))
}

/// Create all routes for the admin panel.
///
/// `max_upload_bytes` caps the body of the price import.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api/products", product_routes())
        .nest("/api/subrubros", subrubro_routes())
        .route(
            "/api/update-prices",
            post(prices::update_prices).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .nest("/api/users", user_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rubro() {
        assert_eq!(parse_rubro(None).ok(), Some(None));
        assert_eq!(parse_rubro(Some(" ")).ok(), Some(None));
        assert_eq!(parse_rubro(Some("darccuir")).ok(), Some(Some(Rubro::Darccuir)));
        assert!(matches!(
            parse_rubro(Some("otros")),
            Err(AppError::BadRequest(_))
        ));
    }
}
