//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                               - Health check
//! GET    /health/ready                         - Readiness check (database)
//!
//! # Catalog
//! GET    /api/products/{rubro}                 - Search / list products
//! GET    /api/products/{rubro}/{id}            - Product detail
//! GET    /api/products/{rubro}/{id}/similar    - Similar products
//! GET    /api/subrubros/{rubro}                - Category tree
//!
//! # Cart
//! GET    /api/cart                             - Current cart with total
//! POST   /api/cart/items                       - Add a product
//! PATCH  /api/cart/items/{id}                  - Change quantity (0 removes)
//! DELETE /api/cart/items/{id}                  - Remove a line
//!
//! # Auth
//! POST   /api/auth/register                    - Register (retail or wholesale)
//! POST   /api/auth/login                       - Login
//! POST   /api/auth/logout                      - Logout
//! GET    /api/auth/session                     - Logged-in customer
//! ```

pub mod auth;
pub mod cart;
pub mod products;
pub mod subrubros;

use axum::{
    Router,
    routing::{get, patch, post},
};

use darccuir_core::Rubro;

use crate::error::AppError;
use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Parse the `{rubro}` path segment.
pub(crate) fn parse_rubro(raw: &str) -> Result<Rubro, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest("Rubro inválido".to_owned()))
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{rubro}", get(products::search))
        .route("/{rubro}/{id}", get(products::show))
        .route("/{rubro}/{id}/similar", get(products::similar))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{id}", patch(cart::update).delete(cart::remove))
        .layer(api_rate_limiter())
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(limited)
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/subrubros/{rubro}", get(subrubros::tree))
        .nest("/api/cart", cart_routes())
        .nest("/api/auth", auth_routes())
}
