//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against the in-memory store and cache.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use user_stats_api::{
    api::create_router,
    cache::{MemoryCache, RedisCache},
    store::{MemoryUserStore, UserStore},
    AppState, Config,
};

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: MemoryUserStore,
    cache: MemoryCache,
}

fn create_test_app() -> TestApp {
    let store = MemoryUserStore::new();
    let cache = MemoryCache::new();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(cache.clone()),
        Config::in_memory(),
    );
    TestApp {
        router: create_router(state),
        store,
        cache,
    }
}

/// Router whose cache is Redis at an address that accepts connections and
/// drops them straight away.
async fn create_dropping_redis_app() -> (Router, MemoryUserStore, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        loop {
            let _ = listener.accept().await;
        }
    });

    let store = MemoryUserStore::new();
    let cache = RedisCache::open(&format!("redis://{}", addr)).unwrap();
    let state = AppState::new(Arc::new(store.clone()), Arc::new(cache), Config::in_memory());
    (create_router(state), store, server)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn create_user(app: &Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Banner ==

#[tokio::test]
async fn test_banner_endpoint() {
    let app = create_test_app();

    let (status, json) = get(&app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].is_string());
    assert_eq!(json["environment"], "development");
    assert!(json["version"].is_string());
}

// == User Creation ==

#[tokio::test]
async fn test_create_user_success() {
    let app = create_test_app();
    let requested_at = Utc::now();

    let (status, json) = create_user(
        &app.router,
        r#"{"username":"ada","email":"ada@example.com","full_name":"Ada Lovelace"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["id"].as_i64().unwrap() > 0);
    assert_eq!(json["username"], "ada");
    assert_eq!(json["full_name"], "Ada Lovelace");

    let created_at: DateTime<Utc> = json["created_at"].as_str().unwrap().parse().unwrap();
    assert!(created_at >= requested_at);
}

#[tokio::test]
async fn test_create_duplicate_username() {
    let app = create_test_app();
    create_user(&app.router, r#"{"username":"ada","email":"ada@example.com"}"#).await;

    let (status, json) =
        create_user(&app.router, r#"{"username":"ada","email":"other@example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (_, users) = get(&app.router, "/users").await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "ada@example.com");
}

#[tokio::test]
async fn test_create_duplicate_email() {
    let app = create_test_app();
    create_user(&app.router, r#"{"username":"ada","email":"ada@example.com"}"#).await;

    let (status, _) =
        create_user(&app.router, r#"{"username":"countess","email":"ada@example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_blank_username() {
    let app = create_test_app();

    let (status, json) =
        create_user(&app.router, r#"{"username":"","email":"a@example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Username"));
}

#[tokio::test]
async fn test_create_invalid_json() {
    let app = create_test_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"username":"ada"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 422 for bodies that do not match the schema
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_with_database_down() {
    let app = create_test_app();
    app.store.set_reachable(false);

    let (status, json) =
        create_user(&app.router, r#"{"username":"ada","email":"ada@example.com"}"#).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_create_with_cache_down_still_succeeds() {
    let app = create_test_app();
    app.cache.set_reachable(false);

    let (status, _) =
        create_user(&app.router, r#"{"username":"ada","email":"ada@example.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.count_users().await.unwrap(), 1);
}

// == User Listing ==

#[tokio::test]
async fn test_list_users_newest_first() {
    let app = create_test_app();
    create_user(&app.router, r#"{"username":"a","email":"a@example.com"}"#).await;
    create_user(&app.router, r#"{"username":"b","email":"b@example.com"}"#).await;

    let (status, json) = get(&app.router, "/users").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[tokio::test]
async fn test_list_users_empty() {
    let app = create_test_app();

    let (status, json) = get(&app.router, "/users").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_users_database_down() {
    let app = create_test_app();
    app.store.set_reachable(false);

    let (status, _) = get(&app.router, "/users").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// == Statistics ==

#[tokio::test]
async fn test_statistics_cached_between_reads() {
    let app = create_test_app();
    create_user(&app.router, r#"{"username":"ada","email":"ada@example.com"}"#).await;

    let (status, first) = get(&app.router, "/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total_users"], 1);
    assert_eq!(first["cache_status"], "active");
    assert_eq!(first["database_status"], "active");

    let (_, second) = get(&app.router, "/statistics").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_statistics_reflect_creation() {
    let app = create_test_app();
    create_user(&app.router, r#"{"username":"a","email":"a@example.com"}"#).await;

    let (_, before) = get(&app.router, "/statistics").await;
    assert_eq!(before["total_users"], 1);

    create_user(&app.router, r#"{"username":"b","email":"b@example.com"}"#).await;

    let (_, after) = get(&app.router, "/statistics").await;
    assert_eq!(after["total_users"], 2);
}

#[tokio::test]
async fn test_statistics_cache_down() {
    let app = create_test_app();
    app.cache.set_reachable(false);

    let (status, json) = get(&app.router, "/statistics").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("Cache"));
}

#[tokio::test]
async fn test_statistics_database_down_on_miss() {
    let app = create_test_app();
    app.store.set_reachable(false);

    let (status, _) = get(&app.router, "/statistics").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_statistics_served_from_cache_while_database_down() {
    let app = create_test_app();
    get(&app.router, "/statistics").await;
    app.store.set_reachable(false);

    let (status, json) = get(&app.router, "/statistics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_users"], 0);
}

#[tokio::test]
async fn test_statistics_corrupted_cache_entry() {
    let app = create_test_app();
    app.cache
        .insert_raw("system_statistics", "garbage", Some(300))
        .await;

    let (status, json) = get(&app.router, "/statistics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_users"], 0);
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint_healthy() {
    let app = create_test_app();

    let (status, json) = get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["services"]["cache"], "active");
    assert_eq!(json["services"]["database"], "active");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_degraded_when_cache_down() {
    let app = create_test_app();
    app.cache.set_reachable(false);

    let (status, json) = get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["services"]["cache"], "inactive");
    assert_eq!(json["services"]["database"], "active");
}

#[tokio::test]
async fn test_health_degraded_when_database_down() {
    let app = create_test_app();
    app.store.set_reachable(false);

    let (status, json) = get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["services"]["database"], "inactive");
}

#[tokio::test]
async fn test_health_degraded_when_redis_drops_connections() {
    let (router, _, server) = create_dropping_redis_app().await;

    let (status, json) = get(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["services"]["cache"], "inactive");
    assert_eq!(json["services"]["database"], "active");
    server.abort();
}

#[tokio::test]
async fn test_redis_dropping_connections_keeps_requests_alive() {
    let (router, store, server) = create_dropping_redis_app().await;

    let (status, _) =
        create_user(&router, r#"{"username":"ada","email":"ada@example.com"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.count_users().await.unwrap(), 1);

    let (status, json) = get(&router, "/statistics").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("Cache"));
    server.abort();
}

// == Internal Errors ==

#[tokio::test]
async fn test_list_users_query_failure_is_generic_500() {
    let app = create_test_app();
    app.store.set_queries_failing(true);

    let (status, json) = get(&app.router, "/users").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal server error");
}

#[tokio::test]
async fn test_statistics_query_failure_is_generic_500() {
    let app = create_test_app();
    app.store.set_queries_failing(true);

    let (status, json) = get(&app.router, "/statistics").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal server error");
    assert!(app.cache.peek("system_statistics").await.is_none());
}

#[tokio::test]
async fn test_create_query_failure_is_generic_500() {
    let app = create_test_app();
    app.store.set_queries_failing(true);

    let (status, json) =
        create_user(&app.router, r#"{"username":"ada","email":"ada@example.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal server error");
    assert!(!json.to_string().contains("relation"));
}
