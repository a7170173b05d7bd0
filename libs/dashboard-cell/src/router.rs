use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers::*;
use crate::services::{SnapshotCache, SnapshotFetcher};

#[derive(Clone)]
pub struct DashboardState {
    pub config: Arc<AppConfig>,
    pub cache: SnapshotCache,
    pub fetcher: SnapshotFetcher,
}

impl DashboardState {
    pub fn new(config: Arc<AppConfig>, cache: SnapshotCache) -> Self {
        let fetcher = SnapshotFetcher::new(&config);
        Self {
            config,
            cache,
            fetcher,
        }
    }
}

pub fn dashboard_routes(state: DashboardState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/stats", get(get_dashboard_stats))
        .route("/snapshot", get(get_snapshot))
        .route("/refresh", post(refresh_dashboard))
        .layer(middleware::from_fn_with_state(config, session_middleware))
        .with_state(state)
}
