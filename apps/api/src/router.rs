use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};

use case_cell::router::case_routes;
use dashboard_cell::{dashboard_routes, DashboardState, SnapshotCache};
use doctor_cell::router::doctor_routes;
use shared_config::AppConfig;
use triage_cell::{triage_routes, TriageState};

pub fn create_router(state: Arc<AppConfig>, cache: SnapshotCache) -> Router {
    Router::new()
        .route("/", get(|| async { "CareDesk coordination gateway is running!" }))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/cases", case_routes(state.clone()))
        .nest(
            "/dashboard",
            dashboard_routes(DashboardState::new(state.clone(), cache.clone())),
        )
        .nest("/triage", triage_routes(TriageState::with_defaults(state)))
        .layer(middleware::from_fn_with_state(cache, invalidate_on_mutation))
}

/// Successful writes to doctors or cases make the dashboard snapshot stale.
async fn invalidate_on_mutation(
    State(cache): State<SnapshotCache>,
    request: Request,
    next: Next,
) -> Response {
    let mutates = is_mutation(request.method(), request.uri().path());
    let response = next.run(request).await;

    if mutates && response.status().is_success() {
        cache.invalidate().await;
    }

    response
}

fn is_mutation(method: &Method, path: &str) -> bool {
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return false;
    }
    // Login is a POST that writes nothing.
    if path == "/doctors/login" {
        return false;
    }
    path.starts_with("/doctors") || path.starts_with("/cases")
}
