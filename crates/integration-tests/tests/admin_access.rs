//! Integration tests for admin authentication and authorization.
//!
//! These tests require a running admin server; the logged-in cases also need
//! `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`.

use darccuir_integration_tests::{admin_base_url, admin_client, client};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_api_requires_session() {
    let anonymous = client();
    let base_url = admin_base_url();

    for path in ["/api/products", "/api/subrubros", "/api/users"] {
        let resp = anonymous
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to call admin API");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_responses_not_cached() {
    let resp = client()
        .get(format!("{}/api/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to call admin API");
    assert_eq!(
        resp.headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_bad_credentials() {
    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .json(&json!({ "email": "nadie@test.local", "password": "incorrecta" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and TEST_ADMIN_* credentials"]
async fn test_logout_ends_session() {
    let admin = admin_client().await;
    let base_url = admin_base_url();

    let resp = admin
        .get(format!("{base_url}/api/users"))
        .send()
        .await
        .expect("Failed to list users");
    assert_eq!(resp.status(), StatusCode::OK);

    let users: Value = resp.json().await.expect("Invalid JSON");
    let leaked = users
        .as_array()
        .is_some_and(|list| list.iter().any(|u| u.get("passwordHash").is_some()));
    assert!(!leaked, "password hash serialized");

    let resp = admin
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = admin
        .get(format!("{base_url}/api/users"))
        .send()
        .await
        .expect("Failed to list users");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
