use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers::*;

pub fn case_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_cases).post(submit_case))
        .route("/department/{department}", get(get_department_cases))
        .route("/{case_id}", get(get_case).delete(delete_case))
        .route("/{case_id}/status", put(update_case_status))
        .route("/{case_id}/doctor", put(assign_doctor))
        .route("/{case_id}/candidates", get(get_assignment_candidates))
        .layer(middleware::from_fn_with_state(config.clone(), session_middleware))
        .with_state(config)
}
