//! Dashboard router tests.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use catclip_analytics::PerformanceStore;
use catclip_api::{create_router, ApiConfig, AppState};
use catclip_models::{EngagementCounts, PerformanceRecord};

fn test_router(store: Arc<PerformanceStore>) -> Router {
    create_router(AppState::new(ApiConfig::default(), store), None)
}

fn seeded_store() -> Arc<PerformanceStore> {
    let store = Arc::new(PerformanceStore::new());
    // Monday 2024-01-15 14:00 UTC and Tuesday 2024-01-16 09:00 UTC
    let monday = Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap();
    let tuesday = Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap();
    store.append(PerformanceRecord::with_rate(
        "p1",
        "test1",
        EngagementCounts::new(150, 20, 0, 1000),
        0.2,
        monday,
    ));
    store.append(PerformanceRecord::with_rate(
        "p2",
        "test2",
        EngagementCounts::new(250, 40, 10, 1000),
        0.3,
        tuesday,
    ));
    store
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_reports_record_count() {
    let (status, body) = get(test_router(seeded_store()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["records"], 2);

    let (status, _) = get(test_router(seeded_store()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_endpoint_absent_when_disabled() {
    let response = test_router(seeded_store())
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = test_router(seeded_store())
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_empty_store_queries() {
    let store = Arc::new(PerformanceStore::new());

    let (status, body) = get(test_router(store.clone()), "/api/analytics/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_posts"], 0);
    assert_eq!(body["average_engagement_rate"], 0.0);
    assert!(body["best_performing_post"].is_null());

    let (_, body) = get(test_router(store.clone()), "/api/analytics/best").await;
    assert_eq!(body, json!([]));

    let (_, body) = get(test_router(store), "/api/analytics/time-slots").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_best_performing_ordering_and_limits() {
    let store = seeded_store();

    let (status, body) = get(test_router(store.clone()), "/api/analytics/best?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["post_id"], "p2");

    for uri in ["/api/analytics/best", "/api/analytics/best?limit=0", "/api/analytics/best?limit=-3"] {
        let (status, body) = get(test_router(store.clone()), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        let posts: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["post_id"].as_str().unwrap())
            .collect();
        assert_eq!(posts, vec!["p2", "p1"], "{}", uri);
    }
}

#[tokio::test]
async fn test_best_performing_rejects_non_numeric_limit() {
    let (status, body) = get(test_router(seeded_store()), "/api/analytics/best?limit=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_time_slots_and_average() {
    let store = seeded_store();

    let (_, body) = get(test_router(store.clone()), "/api/analytics/time-slots").await;
    assert_eq!(
        body,
        json!([
            { "day_of_week": 2, "hour": 9, "performance_score": 0.3, "post_count": 1 },
            { "day_of_week": 1, "hour": 14, "performance_score": 0.2, "post_count": 1 }
        ])
    );

    let (_, body) = get(test_router(store), "/api/analytics/average").await;
    let average = body["average_engagement_rate"].as_f64().unwrap();
    assert!((average - 0.25).abs() < 1e-12);
}

#[tokio::test]
async fn test_summary_totals() {
    let (_, body) = get(test_router(seeded_store()), "/api/analytics/summary").await;
    assert_eq!(body["total_posts"], 2);
    assert_eq!(body["total_views"], 2000);
    assert_eq!(body["total_likes"], 400);
    assert_eq!(body["best_performing_post"]["post_id"], "p2");
    assert_eq!(body["optimal_times"].as_array().unwrap().len(), 2);
}

// ============================================================================
// Ingestion
// ============================================================================

#[tokio::test]
async fn test_submit_performance_appends() {
    let store = Arc::new(PerformanceStore::new());

    let (status, body) = post(
        test_router(store.clone()),
        "/api/analytics/performance",
        json!({
            "post_id": "p9",
            "account_id": "test1",
            "likes": 100,
            "comments": 50,
            "shares": 20,
            "views": 1000,
            "posted_at": "2024-01-15T14:00:00Z"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["post_id"], "p9");
    assert!((body["engagement_rate"].as_f64().unwrap() - 0.17).abs() < 1e-12);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_submit_performance_keeps_supplied_rate() {
    let store = Arc::new(PerformanceStore::new());

    let (status, body) = post(
        test_router(store.clone()),
        "/api/analytics/performance",
        json!({ "post_id": "p3", "account_id": "test2", "views": 10, "engagement_rate": 0.42 }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["engagement_rate"], 0.42);
    assert_eq!(store.snapshot()[0].engagement_rate, 0.42);
}

#[tokio::test]
async fn test_submit_maximal_counts_then_summary() {
    let store = Arc::new(PerformanceStore::new());

    for (post_id, views) in [("big-1", u64::MAX), ("big-2", 1)] {
        let (status, body) = post(
            test_router(store.clone()),
            "/api/analytics/performance",
            json!({
                "post_id": post_id,
                "account_id": "test1",
                "likes": u64::MAX,
                "comments": 1,
                "views": views
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["engagement_rate"].as_f64().unwrap().is_finite());
    }

    let (status, body) = get(test_router(store), "/api/analytics/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_posts"], 2);
    assert_eq!(body["total_views"].as_u64(), Some(u64::MAX));
    assert_eq!(body["total_likes"].as_u64(), Some(u64::MAX));
}

#[tokio::test]
async fn test_submit_performance_rejects_empty_ids() {
    let store = Arc::new(PerformanceStore::new());

    let (status, body) = post(
        test_router(store.clone()),
        "/api/analytics/performance",
        json!({ "post_id": "", "account_id": "test1", "views": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("post_id"));

    let (status, _) = post(
        test_router(store.clone()),
        "/api/analytics/performance",
        json!({ "post_id": "p1", "account_id": "  " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_submit_performance_rejects_malformed_body() {
    let (status, body) = post(
        test_router(Arc::new(PerformanceStore::new())),
        "/api/analytics/performance",
        json!({ "post_id": "p1", "account_id": "test1", "likes": -5 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

// ============================================================================
// Promotion
// ============================================================================

#[tokio::test]
async fn test_promotion_check_boundaries() {
    let store = seeded_store();

    let (status, body) = post(
        test_router(store.clone()),
        "/api/analytics/promotion-check",
        json!({ "post_id": "x", "account_id": "test1", "views": 600, "engagement_rate": 0.38 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["should_promote"], true);
    assert!((body["threshold"].as_f64().unwrap() - 0.375).abs() < 1e-12);
    assert!((body["average_engagement_rate"].as_f64().unwrap() - 0.25).abs() < 1e-12);

    let (_, body) = post(
        test_router(store.clone()),
        "/api/analytics/promotion-check",
        json!({ "post_id": "x", "account_id": "test1", "views": 500, "engagement_rate": 0.9 }),
    )
    .await;
    assert_eq!(body["should_promote"], false);

    // Checks never append.
    assert_eq!(store.len(), 2);
}

// ============================================================================
// Serving
// ============================================================================

fn loopback_config(port: u16) -> ApiConfig {
    ApiConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_bind_fails_when_port_taken() {
    let taken = catclip_api::bind(&loopback_config(0)).await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let result = catclip_api::bind(&loopback_config(port)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_serve_on_bound_listener_until_shutdown() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let config = loopback_config(0);
    let listener = catclip_api::bind(&config).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(catclip_api::serve_on(
        listener,
        AppState::new(config, seeded_store()),
        None,
        async move {
            let _ = rx.await;
        },
    ));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "unexpected response: {response}");

    tx.send(()).unwrap();
    assert!(server.await.unwrap().is_ok());
}
