//! Integration tests for the storefront cart.
//!
//! These tests require both servers running and an admin account in
//! `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` to seed products.

use darccuir_integration_tests::{
    admin_client, client, create_product, delete_product, storefront_base_url, unique,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_empty_cart_for_new_visitor() {
    let resp = client()
        .get(format!("{}/api/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Invalid JSON");
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers"]
async fn test_add_update_remove() {
    let admin = admin_client().await;
    let product = create_product(&admin, &unique("IT-BOLSO"), "darccuir", 12500.0).await;
    let visitor = client();
    let base_url = storefront_base_url();

    // Adding twice merges into one line
    for _ in 0..2 {
        let resp = visitor
            .post(format!("{base_url}/api/cart/items"))
            .json(&json!({ "productId": product["id"], "quantity": 2 }))
            .send()
            .await
            .expect("Failed to add item");
        assert!(resp.status().is_success());
    }

    let cart: Value = visitor
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Invalid JSON");
    let items = cart["items"].as_array().cloned().unwrap_or_default();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|i| i["quantity"].clone()), Some(json!(4)));
    let item_id = items.first().map(|i| i["id"].clone()).unwrap_or_default();

    let resp = visitor
        .patch(format!("{base_url}/api/cart/items/{item_id}"))
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to update item");
    assert!(resp.status().is_success());

    let cart: Value = visitor
        .get(format!("{base_url}/api/cart"))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(cart["items"], json!([]));

    delete_product(&admin, &product["id"]).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_add_unknown_product() {
    let resp = client()
        .post(format!("{}/api/cart/items", storefront_base_url()))
        .json(&json!({ "productId": i32::MAX, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add item");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
