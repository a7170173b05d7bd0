use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use shared_models::{auth::Session, error::AppError};

use crate::router::DashboardState;
use crate::services::projection::project;

#[instrument(skip(state, session))]
pub async fn get_dashboard_stats(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let snapshot = state.cache.get_or_refresh(&state.fetcher, &session).await?;
    let stats = project(&snapshot);

    debug!("Dashboard stats: {:?}", stats);

    Ok(Json(json!({
        "stats": stats,
        "fetched_at": snapshot.fetched_at
    })))
}

#[instrument(skip(state, session))]
pub async fn refresh_dashboard(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    state.cache.invalidate().await;
    let snapshot = state.cache.refresh(&state.fetcher, &session).await?;

    Ok(Json(json!({
        "stats": project(&snapshot),
        "fetched_at": snapshot.fetched_at
    })))
}

/// Cached doctor and case lists as last fetched.
#[instrument(skip(state, session))]
pub async fn get_snapshot(
    State(state): State<DashboardState>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let snapshot = state.cache.get_or_refresh(&state.fetcher, &session).await?;

    Ok(Json(json!({
        "doctors": snapshot.doctors,
        "cases": snapshot.cases,
        "fetched_at": snapshot.fetched_at
    })))
}
