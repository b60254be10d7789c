//! Integration tests for the Darccuir storefront and admin servers.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and create an admin account
//! cargo run -p darccuir-cli -- migrate
//! cargo run -p darccuir-cli -- admin create -e admin@test.local -p secreto -f Test -l Admin
//!
//! # Start both servers, then
//! TEST_ADMIN_EMAIL=admin@test.local TEST_ADMIN_PASSWORD=secreto \
//!     cargo test -p darccuir-integration-tests -- --ignored
//! ```
//!
//! Tests talking to a server are `#[ignore]`d so a plain `cargo test` stays
//! offline.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// HTTP client that keeps session cookies between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Client logged in to the admin API with `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`.
///
/// # Panics
///
/// Panics if the credentials are missing or the login is refused.
pub async fn admin_client() -> Client {
    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL not set");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD not set");

    let client = client();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in to admin");
    assert_eq!(resp.status(), StatusCode::OK, "admin login refused");

    client
}

/// A value unique to this test run, for SKUs and emails.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Create an active product through the admin API and return its JSON.
///
/// # Panics
///
/// Panics if the product cannot be created.
pub async fn create_product(admin: &Client, sku: &str, rubro: &str, price: f64) -> Value {
    let resp = admin
        .post(format!("{}/api/products", admin_base_url()))
        .json(&json!({
            "sku": sku,
            "name": format!("Producto de prueba {sku}"),
            "price": price,
            "priceWholesale": price / 2.0,
            "rubro": rubro,
            "stock": 10,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    resp.json().await.expect("Invalid product JSON")
}

/// Delete a product through the admin API, ignoring failures.
pub async fn delete_product(admin: &Client, id: &Value) {
    let _ = admin
        .delete(format!("{}/api/products/{id}", admin_base_url()))
        .send()
        .await;
}
