use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dashboard_cell::{dashboard_routes, DashboardState, SnapshotCache, SnapshotFetcher};
use shared_models::auth::Session;
use shared_utils::test_utils::{MockCoordinationResponses, TestConfig};

fn create_test_app(mock_server: &MockServer, cache: SnapshotCache) -> Router {
    let config = Arc::new(TestConfig::with_url(mock_server.uri()).to_app_config());
    dashboard_routes(DashboardState::new(config, cache))
}

async fn mount_collections(mock_server: &MockServer, expected_reads: u64) {
    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockCoordinationResponses::doctor_response(1, "cardiology", "approved", true),
            MockCoordinationResponses::doctor_response(2, "cardiology", "approved", false),
            MockCoordinationResponses::doctor_response(3, "neurology", "pending_approval", false),
        ])))
        .expect(expected_reads)
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockCoordinationResponses::case_response(1, "cardiology", "critical", "open", None),
            MockCoordinationResponses::case_response(2, "cardiology", "low", "in_progress", Some(1)),
            MockCoordinationResponses::case_response(3, "neurology", "critical", "closed", Some(1)),
        ])))
        .expect(expected_reads)
        .mount(mock_server)
        .await;
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_stats_are_projected_from_snapshot() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server, 1).await;

    let response = create_test_app(&mock_server, SnapshotCache::new())
        .oneshot(get("/stats"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let stats = &body_json(response).await["stats"];
    assert_eq!(stats["total_doctors"], 3);
    assert_eq!(stats["total_cases"], 3);
    assert_eq!(stats["total_open"], 1);
    assert_eq!(stats["total_active"], 2);
    assert_eq!(stats["total_critical"], 1);
    assert_eq!(stats["available_doctor_count"], 1);
    assert_eq!(stats["pending_approval_count"], 1);
    assert_eq!(stats["active_by_department"]["cardiology"], 2);
}

#[tokio::test]
async fn test_cached_snapshot_is_reused_until_invalidated() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server, 2).await;

    let cache = SnapshotCache::new();
    let app = create_test_app(&mock_server, cache.clone());

    for _ in 0..3 {
        let response = app.clone().oneshot(get("/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    cache.invalidate().await;

    let response = app.oneshot(get("/snapshot")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["cases"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_refresh_always_refetches() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server, 2).await;

    let app = create_test_app(&mock_server, SnapshotCache::new());

    let response = app.clone().oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unreachable_service_is_bad_gateway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(
            MockCoordinationResponses::error_response("database unavailable"),
        ))
        .mount(&mock_server)
        .await;

    let response = create_test_app(&mock_server, SnapshotCache::new())
        .oneshot(get("/stats"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_fetcher_reads_both_collections() {
    let mock_server = MockServer::start().await;
    mount_collections(&mock_server, 1).await;

    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let snapshot = SnapshotFetcher::new(&config)
        .fetch(&Session::Anonymous)
        .await
        .unwrap();

    assert_eq!(snapshot.doctors.len(), 3);
    assert_eq!(snapshot.cases.len(), 3);
}

#[tokio::test]
async fn test_fetch_in_flight_during_invalidation_stays_stale() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([MockCoordinationResponses::case_response(
                    1, "cardiology", "critical", "open", None
                )]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&mock_server)
        .await;

    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    let cache = SnapshotCache::new();
    let fetcher = SnapshotFetcher::new(&config);

    let in_flight = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.refresh(&fetcher, &Session::Anonymous).await })
    };

    // A mutation lands while the slow fetch is still running.
    tokio::time::sleep(Duration::from_millis(100)).await;
    cache.invalidate().await;

    let fetched = in_flight.await.unwrap().unwrap();
    assert_eq!(fetched.cases.len(), 1);

    assert!(cache.is_stale().await);
    assert!(cache.current().await.is_none());
}
