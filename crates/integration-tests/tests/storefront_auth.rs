//! Integration tests for customer registration and login.
//!
//! These tests require a running storefront server.

use darccuir_integration_tests::{client, storefront_base_url, unique};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_session_requires_login() {
    let resp = client()
        .get(format!("{}/api/auth/session", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get session");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_register_login_logout() {
    let customer = client();
    let base_url = storefront_base_url();
    let email = format!("{}@test.local", unique("cliente"));

    let resp = customer
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "firstName": "Ana",
            "lastName": "Pérez",
            "email": email,
            "password": "cuero-y-mate-2026",
            "role": "minorista",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = customer
        .post(format!("{base_url}/api/auth/register"))
        .json(&json!({
            "firstName": "Ana",
            "lastName": "Pérez",
            "email": email,
            "password": "cuero-y-mate-2026",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = customer
        .post(format!("{base_url}/api/auth/login"))
        .json(&json!({ "email": email, "password": "cuero-y-mate-2026" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);

    let session: Value = customer
        .get(format!("{base_url}/api/auth/session"))
        .send()
        .await
        .expect("Failed to get session")
        .json()
        .await
        .expect("Invalid JSON");
    assert_eq!(session["email"], email.as_str());
    assert_eq!(session["role"], "minorista");

    let resp = customer
        .post(format!("{base_url}/api/auth/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert!(resp.status().is_success());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_admin_cannot_self_register() {
    let resp = client()
        .post(format!("{}/api/auth/register", storefront_base_url()))
        .json(&json!({
            "firstName": "Mal",
            "lastName": "Intencionado",
            "email": format!("{}@test.local", unique("root")),
            "password": "no-deberia-funcionar",
            "role": "admin",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_password() {
    let resp = client()
        .post(format!("{}/api/auth/login", storefront_base_url()))
        .json(&json!({ "email": "nadie@test.local", "password": "incorrecta" }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
