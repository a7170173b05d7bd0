use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/register", post(handlers::register_doctor))
        .route("/login", post(handlers::login_doctor))
        .route("/available", get(handlers::get_available_doctors))
        .route("/pending", get(handlers::get_pending_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}/approve", patch(handlers::approve_doctor))
        .route("/{doctor_id}/reject", patch(handlers::reject_doctor))
        .route("/{doctor_id}/availability", put(handlers::update_availability))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .with_state(state)
}
