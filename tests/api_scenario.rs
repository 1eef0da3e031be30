//! End-to-end scenarios through the router over the in-process store

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_server::{
    api::create_router,
    config::AppConfig,
    models::Role,
    repository::Repository,
    services::{Services, TracingLogger},
    AppState,
};

struct TestApp {
    state: AppState,
}

impl TestApp {
    async fn new() -> Self {
        let config = AppConfig::default();
        let repository = Repository::in_memory();
        let services = Services::new(&repository, config.auth.clone(), Arc::new(TracingLogger));
        services
            .auth
            .seed_administrator("admin@bookstore.com", "P@ssword1")
            .await
            .unwrap();
        services
            .auth
            .register("reader@bookstore.com", "secret1", Role::Customer)
            .await
            .unwrap();
        Self {
            state: AppState {
                config: Arc::new(config),
                repository,
                services: Arc::new(services),
            },
        }
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({"email": email, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = create_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

#[tokio::test]
async fn author_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.login("admin@bookstore.com", "P@ssword1").await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/authors",
            Some(&admin),
            Some(json!({"firstname": "A", "lastname": "Writer"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author"]["firstname"], "A");
    let id = body["author"]["id"].as_i64().unwrap();
    assert!(id >= 1);

    let (status, body) = app
        .request(Method::GET, &format!("/api/authors/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["firstname"], "A");

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/authors/{}", id),
            Some(&admin),
            Some(json!({"id": id + 1, "firstname": "B", "lastname": "Writer"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/authors/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(Method::GET, &format!("/api/authors/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Repeating the delete is a 404, not a 204 or 500
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/authors/{}", id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_is_visible_to_readers() {
    let app = TestApp::new().await;
    let admin = app.login("admin@bookstore.com", "P@ssword1").await;
    let reader = app.login("reader@bookstore.com", "secret1").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/api/authors",
            Some(&admin),
            Some(json!({"firstname": "Old", "lastname": "Name"})),
        )
        .await;
    let id = body["author"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/authors/{}", id),
            Some(&admin),
            Some(json!({"id": id, "firstname": "New", "lastname": "Name", "bio": "Updated"})),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.request(Method::GET, "/api/authors", Some(&reader), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["firstname"], "New");
    assert_eq!(body[0]["bio"], "Updated");
}

#[tokio::test]
async fn readers_cannot_write() {
    let app = TestApp::new().await;
    let reader = app.login("reader@bookstore.com", "secret1").await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/authors",
            Some(&reader),
            Some(json!({"firstname": "A", "lastname": "B"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.request(Method::GET, "/api/authors", Some(&reader), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn missing_ids_are_404_for_every_verb() {
    let app = TestApp::new().await;
    let admin = app.login("admin@bookstore.com", "P@ssword1").await;

    let (status, _) = app.request(Method::GET, "/api/authors/77", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/authors/77",
            Some(&admin),
            Some(json!({"id": 77, "firstname": "A", "lastname": "B"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request(Method::DELETE, "/api/authors/77", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn books_link_to_authors() {
    let app = TestApp::new().await;
    let admin = app.login("admin@bookstore.com", "P@ssword1").await;

    let (_, body) = app
        .request(
            Method::POST,
            "/api/authors",
            Some(&admin),
            Some(json!({"firstname": "Ursula", "lastname": "Le Guin"})),
        )
        .await;
    let author_id = body["author"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/books",
            Some(&admin),
            Some(json!({
                "title": "The Dispossessed",
                "isbn": "978-0061054884",
                "year": 1974,
                "author_id": author_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = body["book"]["id"].as_i64().unwrap();

    let (_, body) = app
        .request(Method::GET, &format!("/api/authors/{}", author_id), Some(&admin), None)
        .await;
    assert_eq!(body["books"][0]["title"], "The Dispossessed");

    let (_, body) = app
        .request(Method::GET, &format!("/api/books/{}", book_id), Some(&admin), None)
        .await;
    assert_eq!(body["author"]["lastname"], "Le Guin");

    // Same ISBN again: the store refuses, the caller sees the generic 500
    let (status, _) = app
        .request(
            Method::POST,
            "/api/books",
            Some(&admin),
            Some(json!({"title": "Copy", "isbn": "978-0061054884", "author_id": author_id})),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Deleting the author keeps the book, detached
    let (status, _) = app
        .request(Method::DELETE, &format!("/api/authors/{}", author_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = app
        .request(Method::GET, &format!("/api/books/{}", book_id), Some(&admin), None)
        .await;
    assert!(body["author_id"].is_null());
}
