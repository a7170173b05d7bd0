use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use doctor_cell::models::{Department, DoctorId};
use shared_config::AppConfig;
use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::models::{
    AssignDoctorRequest, CaseFilters, CaseId, CaseStatus, Severity, SubmitCaseRequest,
    UpdateCaseStatusRequest,
};
use crate::services::case::CaseService;

#[derive(Debug, Deserialize)]
pub struct CaseListQuery {
    pub status: Option<CaseStatus>,
    pub department: Option<Department>,
    pub severity: Option<Severity>,
    pub doctor_id: Option<DoctorId>,
    pub active_only: Option<bool>,
}

#[axum::debug_handler]
pub async fn submit_case(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<SubmitCaseRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = CaseService::new(&config);

    let case = service.submit_case(request).await?;

    Ok((StatusCode::CREATED, Json(json!(case))))
}

#[axum::debug_handler]
pub async fn list_cases(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Query(query): Query<CaseListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = CaseService::new(&config);

    let filters = CaseFilters {
        status: query.status,
        case_type: query.department,
        severity: query.severity,
        assigned_doctor_id: query.doctor_id,
        active_only: query.active_only,
    };

    let cases = service.list_cases(&session, &filters).await?;

    Ok(Json(json!({
        "cases": cases,
        "total": cases.len()
    })))
}

#[axum::debug_handler]
pub async fn get_department_cases(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(department): Path<Department>,
) -> Result<Json<Value>, AppError> {
    let service = CaseService::new(&config);

    let cases = service.cases_for_department(&session, department).await?;

    Ok(Json(json!({
        "department": department,
        "cases": cases,
        "total": cases.len()
    })))
}

#[axum::debug_handler]
pub async fn get_case(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(case_id): Path<CaseId>,
) -> Result<Json<Value>, AppError> {
    let service = CaseService::new(&config);

    let case = service.get_case(&session, case_id).await?;

    Ok(Json(json!(case)))
}

#[axum::debug_handler]
pub async fn update_case_status(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(case_id): Path<CaseId>,
    Json(request): Json<UpdateCaseStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CaseService::new(&config);

    let case = service.update_case_status(&session, case_id, request.status).await?;

    Ok(Json(json!(case)))
}

#[axum::debug_handler]
pub async fn assign_doctor(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(case_id): Path<CaseId>,
    Json(request): Json<AssignDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CaseService::new(&config);

    let case = service.assign_doctor(&session, case_id, request.doctor_id).await?;

    Ok(Json(json!({
        "case": case,
        "status_update_pending": case.has_pending_status_update()
    })))
}

#[axum::debug_handler]
pub async fn get_assignment_candidates(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(case_id): Path<CaseId>,
) -> Result<Json<Value>, AppError> {
    let service = CaseService::new(&config);

    let doctors = service.assignment_candidates(&session, case_id).await?;

    Ok(Json(json!({
        "case_id": case_id,
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_case(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(case_id): Path<CaseId>,
) -> Result<StatusCode, AppError> {
    let service = CaseService::new(&config);

    service.delete_case(&session, case_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
