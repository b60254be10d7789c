//! Integration tests for the storefront catalog.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - Both servers running (the admin API seeds products)
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` for an admin account

use darccuir_core::paging::MAX_PAGE_SIZE;
use darccuir_integration_tests::{
    admin_client, client, create_product, delete_product, storefront_base_url, unique,
};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .expect("Failed to call health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap_or_default(), "ok");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_rubro_rejected() {
    let resp = client()
        .get(format!("{}/api/products/otros", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["error"], "Rubro inválido");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_limit_clamped() {
    let resp = client()
        .get(format!("{}/api/products/darccuir?limit=500", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["pagination"]["limit"], MAX_PAGE_SIZE);
    assert_eq!(body["pagination"]["page"], 1);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_search_finds_created_product() {
    let admin = admin_client().await;
    let sku = unique("IT-MATE");
    let product = create_product(&admin, &sku, "yatay", 15000.0).await;

    let resp = client()
        .get(format!("{}/api/products/yatay", storefront_base_url()))
        .query(&[("q", sku.as_str())])
        .send()
        .await
        .expect("Failed to search");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    let found = body["productos"]
        .as_array()
        .is_some_and(|list| list.iter().any(|p| p["id"] == product["id"]));
    assert!(found, "created product missing from search results");
    assert_eq!(body["searchInfo"]["resultsFound"], true);

    delete_product(&admin, &product["id"]).await;
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_detail_hides_wholesale_price_from_guests() {
    let admin = admin_client().await;
    let product = create_product(&admin, &unique("IT-CINTO"), "darccuir", 8000.0).await;

    let resp = client()
        .get(format!(
            "{}/api/products/darccuir/{}",
            storefront_base_url(),
            product["id"]
        ))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["sku"], product["sku"]);
    assert!(body.get("priceWholesale").is_none());

    delete_product(&admin, &product["id"]).await;
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_product_of_other_rubro_not_found() {
    let admin = admin_client().await;
    let product = create_product(&admin, &unique("IT-TERMO"), "yatay", 20000.0).await;

    let resp = client()
        .get(format!(
            "{}/api/products/darccuir/{}",
            storefront_base_url(),
            product["id"]
        ))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    delete_product(&admin, &product["id"]).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_subrubro_tree() {
    let resp = client()
        .get(format!("{}/api/subrubros/darccuir", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get tree");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_subrubro_slug_is_empty() {
    let resp = client()
        .get(format!(
            "{}/api/products/darccuir?subrubro=no-existe",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["productos"], serde_json::json!([]));
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["hasMore"], false);
    assert!(body["searchInfo"].is_null());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_subrubro_slug_search_is_plain_listing() {
    let resp = client()
        .get(format!(
            "{}/api/products/darccuir?subrubro=no-existe&q=mate",
            storefront_base_url()
        ))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let cache = resp
        .headers()
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(cache.starts_with("public"));

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["pagination"]["total"], 0);
    assert!(body["searchInfo"].is_null());
}
