//! API integration tests, run against a live server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique_email(prefix: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}@Example.ORG", prefix, stamp)
}

/// Register a fresh member and return its token
async fn register_member(client: &Client) -> (String, Value) {
    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "email": unique_email("member"),
            "username": "member",
            "password1": "correct horse",
            "password2": "correct horse"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse register response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (token, body)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_creates_member_profile() {
    let client = Client::new();
    let (_, body) = register_member(&client).await;

    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["profile"]["role"], "Member");
    assert_eq!(body["profile"]["user_id"], body["user"]["id"]);
    assert!(body["user"]["email"].as_str().unwrap().ends_with("@example.org"));
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_register_password_mismatch() {
    let client = Client::new();

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "email": unique_email("mismatch"),
            "username": "mismatch",
            "password1": "correct horse",
            "password2": "battery staple"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_login_after_register() {
    let client = Client::new();
    let email = unique_email("login");

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "email": email,
            "username": "login",
            "password1": "correct horse",
            "password2": "correct horse"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "correct horse" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong password" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_me_returns_profile() {
    let client = Client::new();
    let (token, _) = register_member(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["profile"]["role"], "Member");
}

#[tokio::test]
#[ignore]
async fn test_member_dashboards() {
    let client = Client::new();
    let (token, _) = register_member(&client).await;

    let response = client
        .get(format!("{}/dashboard/member", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user_role"], "Member");
    assert!(body["books"].is_array());
    assert!(body["libraries"].is_array());

    for denied in ["admin", "librarian"] {
        let response = client
            .get(format!("{}/dashboard/{}", BASE_URL, denied))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 403, "dashboard {}", denied);
    }
}

#[tokio::test]
#[ignore]
async fn test_list_books() {
    let client = Client::new();
    let (token, _) = register_member(&client).await;

    let response = client
        .get(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_use_admin() {
    let client = Client::new();
    let (token, _) = register_member(&client).await;

    let response = client
        .get(format!("{}/admin", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    for path in ["books", "auth/me", "dashboard/member", "admin/users"] {
        let response = client
            .get(format!("{}/{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 401, "path {}", path);
    }
}

#[tokio::test]
#[ignore]
async fn test_register_form() {
    let client = Client::new();

    let response = client
        .get(format!("{}/register", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["fields"].as_array().unwrap().len() >= 4);
}
