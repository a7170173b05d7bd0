use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::Session;
use shared_models::error::AppError;

use crate::models::{
    Department, DoctorFilters, DoctorId, DoctorLoginRequest, DoctorStatus,
    RegisterDoctorRequest, UpdateAvailabilityRequest,
};
use crate::services::doctor::DoctorService;

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub department: Option<Department>,
    pub status: Option<DoctorStatus>,
    pub available_only: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DepartmentQuery {
    pub department: Department,
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn register_doctor(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<RegisterDoctorRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.register_doctor(request).await?;

    Ok((StatusCode::CREATED, Json(json!(doctor))))
}

#[axum::debug_handler]
pub async fn login_doctor(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<DoctorLoginRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.login(request).await?;

    Ok(Json(json!({
        "doctor": doctor,
        "approved": doctor.is_approved()
    })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let filters = DoctorFilters {
        department: query.department,
        status: query.status,
        available_only: query.available_only,
    };

    let doctors = doctor_service.search_doctors(&session, &filters).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_available_doctors(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Query(query): Query<DepartmentQuery>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service
        .available_doctors_by_department(&session, query.department)
        .await?;

    Ok(Json(json!({
        "department": query.department,
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<DoctorId>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.get_doctor(&session, doctor_id).await?;

    Ok(Json(json!(doctor)))
}

// ==============================================================================
// SESSION-GATED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_pending_doctors(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.pending_doctors(&session).await?;

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn approve_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<DoctorId>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.approve_doctor(&session, doctor_id).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn reject_doctor(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<DoctorId>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctor = doctor_service.reject_doctor(&session, doctor_id).await?;

    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppConfig>>,
    Extension(session): Extension<Session>,
    Path(doctor_id): Path<DoctorId>,
    Json(request): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    doctor_service
        .update_availability(&session, doctor_id, request.available)
        .await?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "available": request.available
    })))
}
