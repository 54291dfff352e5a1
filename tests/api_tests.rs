//! API integration tests against the in-memory book store

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookstore_server::{
    config::AppConfig, create_router, repository::Repository, services::Services, AppState,
};

fn app() -> Router {
    let state = AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(Services::new(Repository::in_memory())),
    };
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, title: &str, author: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/books",
        Some(json!({
            "title": title,
            "author": author,
            "genre": "Ficcao",
            "price": 30,
            "stock": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, "GET", "/api/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_list_books_empty_then_filled() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    create(&app, "Dune", "Herbert").await;
    let (status, body) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_create_and_duplicate() {
    let app = app();
    let created = create(&app, "Dune", "Herbert").await;
    assert!(created["id"].is_string());
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["genre"], "Ficcao");
    assert_eq!(created["price"], 30.0);
    assert_eq!(created["stock"], 5);
    assert!(created["createdAt"].is_string());
    assert!(created["updatedAt"].is_null());

    let (status, body) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"title": "Dune", "author": "Herbert", "genre": 10, "price": 12, "stock": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let app = app();
    for body in [
        json!({"title": "D", "author": "Herbert", "genre": "Ficcao"}),
        json!({"title": "Dune", "author": "Herbert", "genre": "Ficcao", "price": -1}),
        json!({"title": "Dune", "author": "Herbert", "genre": "Ficcao", "stock": -1}),
        json!({"title": "Dune", "author": "Herbert", "genre": "Poesia"}),
        json!({"title": "Dune", "author": "Herbert", "genre": 12}),
        json!({"author": "Herbert", "genre": "Ficcao"}),
    ] {
        let (status, response) = send(&app, "POST", "/api/books", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {response}");
    }

    let (status, _) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_get_book() {
    let app = app();
    let created = create(&app, "Dune", "Herbert").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let (status, _) = send(
        &app,
        "GET",
        "/api/books/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/books/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_price_only() {
    let app = app();
    let created = create(&app, "Dune", "Herbert").await;
    let uri = format!("/api/books/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"price": 40.5}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["price"], 40.5);
    assert_eq!(body["title"], created["title"]);
    assert_eq!(body["author"], created["author"]);
    assert_eq!(body["genre"], created["genre"]);
    assert_eq!(body["stock"], created["stock"]);
    assert_eq!(body["createdAt"], created["createdAt"]);
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_update_errors() {
    let app = app();
    create(&app, "Dune", "Herbert").await;
    let messiah = create(&app, "Dune Messiah", "Herbert").await;
    let uri = format!("/api/books/{}", messiah["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"stock": -1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"genre": 99}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"title": "Dune"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body, messiah);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/books/00000000-0000-0000-0000-000000000000",
        Some(json!({"stock": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = app();
    let created = create(&app, "Dune", "Herbert").await;
    let uri = format!("/api/books/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_search() {
    let app = app();
    create(&app, "Dune", "Herbert").await;
    for title in ["Persuasion", "Emma", "Mansfield Park", "Northanger Abbey", "Sanditon"] {
        create(&app, title, "Austen").await;
    }

    let (status, body) = send(&app, "GET", "/api/books/search?valor=Dun", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "page": 1,
            "pageSize": 10,
            "totalItems": 1,
            "totalPages": 1,
            "items": [{"title": "Dune", "genre": "Ficcao", "price": 30.0, "stock": 5}]
        })
    );

    let (status, body) = send(
        &app,
        "GET",
        "/api/books/search?valor=Austen&page=2&pageSize=2",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 5);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["items"][0]["title"], "Northanger Abbey");
    assert_eq!(body["items"][1]["title"], "Persuasion");

    let (status, _) = send(
        &app,
        "GET",
        "/api/books/search?valor=Austen&page=2&pageSize=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/books/search?valor=Tolkien", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_with_maximal_page_size() {
    let app = app();
    create(&app, "Emma", "Austen").await;
    create(&app, "Persuasion", "Austen").await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/books/search?valor=Austen&pageSize=9223372036854775807",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageSize"], i64::MAX);
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_nul_characters_are_rejected() {
    let app = app();
    let created = create(&app, "Dune", "Herbert").await;
    let uri = format!("/api/books/{}", created["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({"title": "Du\0ne", "author": "Herbert", "genre": "Ficcao"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"author": "Her\0bert"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/books/search?valor=Du%00ne", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_bad_parameters() {
    let app = app();
    create(&app, "Dune", "Herbert").await;

    for uri in [
        "/api/books/search",
        "/api/books/search?valor=",
        "/api/books/search?valor=%20%20",
        "/api/books/search?valor=Dune&page=0",
        "/api/books/search?valor=Dune&pageSize=-5",
        "/api/books/search?valor=Dune&page=abc",
    ] {
        let (status, _) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}
