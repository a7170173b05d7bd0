use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::instrument;

use case_cell::models::CaseId;
use case_cell::services::CaseService;
use shared_models::{auth::Session, error::AppError};

use crate::models::{SymptomReport, TriageError};
use crate::router::TriageState;

#[instrument(skip(state, report))]
pub async fn check_symptoms(
    State(state): State<TriageState>,
    Json(report): Json<SymptomReport>,
) -> Result<Json<Value>, AppError> {
    let suggestion = state.checker.assess(&report).await?;

    Ok(Json(json!(suggestion)))
}

#[instrument(skip(state, session))]
pub async fn get_case_vitals(
    State(state): State<TriageState>,
    Extension(session): Extension<Session>,
    Path(case_id): Path<CaseId>,
) -> Result<Json<Value>, AppError> {
    if session == Session::Anonymous {
        return Err(TriageError::Unauthorized("Vitals are visible to staff only".to_string()).into());
    }

    let case_service = CaseService::new(&state.config);
    let case = case_service
        .get_case(&session, case_id)
        .await
        .map_err(TriageError::from)?;
    let vitals = state.monitor.vitals_for(&case).await?;

    Ok(Json(json!({
        "case_id": case.id,
        "severity": case.severity,
        "vitals": vitals
    })))
}
