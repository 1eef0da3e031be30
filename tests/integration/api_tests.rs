//! API integration tests against a running server
//!
//! Start the server with an administrator configured
//! (`BOOKSTORE_ADMIN__EMAIL=admin@bookstore.com`,
//! `BOOKSTORE_ADMIN__PASSWORD=P@ssword1`), then run
//! `cargo test --test integration -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api";

/// Helper to get an administrator token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/users/login", BASE_URL))
        .json(&json!({
            "email": "admin@bookstore.com",
            "password": "P@ssword1"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test --test integration -- --ignored
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users/login", BASE_URL))
        .json(&json!({
            "email": "admin@bookstore.com",
            "password": "wrong-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_authors_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_author_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "firstname": "A",
            "lastname": "Integration"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["author"]["firstname"], "A");
    let author_id = body["author"]["id"].as_i64().expect("No author ID");

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .put(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .json(&json!({
            "id": author_id + 1,
            "firstname": "B",
            "lastname": "Integration"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_email_differing_only_in_case() {
    let client = Client::new();
    let stamp = chrono::Utc::now().timestamp_millis();
    let email = format!("Reader{}@Bookstore.com", stamp);

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({ "email": email, "password": "secret1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .post(format!("{}/users/register", BASE_URL))
        .json(&json!({ "email": email.to_lowercase(), "password": "secret1" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 500);
}
