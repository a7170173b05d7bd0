use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::{CoordinationClient, Method, ServiceError};
use shared_models::auth::Session;

use crate::models::{
    Department, Doctor, DoctorError, DoctorFilters, DoctorId, DoctorLoginRequest,
    DoctorStatus, LoginOutcome, RegisterDoctorRequest,
};
use crate::services::approval::DoctorApprovalService;
use crate::services::registration::{normalize_registration, validate_registration_code};

#[derive(Clone)]
pub struct DoctorService {
    client: CoordinationClient,
    approval: DoctorApprovalService,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(CoordinationClient::new(config))
    }

    pub fn with_client(client: CoordinationClient) -> Self {
        Self {
            client,
            approval: DoctorApprovalService::new(),
        }
    }

    /// Register a new doctor; the service creates it in `pending_approval`.
    pub async fn register_doctor(&self, request: RegisterDoctorRequest) -> Result<Doctor, DoctorError> {
        let request = normalize_registration(request)?;
        debug!("Registering doctor {} in {}", request.name, request.department);

        let doctor: Doctor = self
            .client
            .request(Method::POST, "/doctors", &Session::Anonymous, Some(json!(request)))
            .await?;

        if doctor.status != DoctorStatus::PendingApproval {
            warn!(
                "Coordination service registered doctor {} directly as {}",
                doctor.id, doctor.status
            );
        }

        info!("Doctor {} registered, awaiting approval", doctor.id);
        Ok(doctor)
    }

    pub async fn login(&self, request: DoctorLoginRequest) -> Result<Doctor, DoctorError> {
        debug!("Doctor login attempt for id {}", request.doctor_id);

        // A malformed code can never match, so skip the round trip.
        if validate_registration_code(&request.registration_code).is_err() {
            return Err(DoctorError::InvalidCredentials);
        }

        let outcome: LoginOutcome = self
            .client
            .request(Method::POST, "/doctors/login", &Session::Anonymous, Some(json!(request)))
            .await?;

        match &outcome {
            LoginOutcome::Success { doctor } => info!("Doctor {} logged in", doctor.id),
            other => warn!("Doctor login for {} refused: {:?}", request.doctor_id, other),
        }

        outcome.into_result()
    }

    pub async fn get_doctor(&self, session: &Session, doctor_id: DoctorId) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor {}", doctor_id);

        self.client
            .request(Method::GET, &format!("/doctors/{}", doctor_id), session, None)
            .await
            .map_err(|e| not_found_as(doctor_id, e))
    }

    pub async fn list_doctors(&self, session: &Session) -> Result<Vec<Doctor>, DoctorError> {
        Ok(self.client.request(Method::GET, "/doctors", session, None).await?)
    }

    pub async fn search_doctors(
        &self,
        session: &Session,
        filters: &DoctorFilters,
    ) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Searching doctors with filters: {:?}", filters);

        let mut doctors: Vec<Doctor> = self
            .list_doctors(session)
            .await?
            .into_iter()
            .filter(|d| filters.matches(d))
            .collect();
        doctors.sort_by_key(|d| d.id);

        Ok(doctors)
    }

    /// Approved and available doctors of one department.
    pub async fn available_doctors_by_department(
        &self,
        session: &Session,
        department: Department,
    ) -> Result<Vec<Doctor>, DoctorError> {
        self.search_doctors(
            session,
            &DoctorFilters {
                department: Some(department),
                status: Some(DoctorStatus::Approved),
                available_only: Some(true),
            },
        )
        .await
    }

    pub async fn pending_doctors(&self, session: &Session) -> Result<Vec<Doctor>, DoctorError> {
        self.approval.authorize_decision(session)?;

        self.search_doctors(
            session,
            &DoctorFilters {
                status: Some(DoctorStatus::PendingApproval),
                ..DoctorFilters::default()
            },
        )
        .await
    }

    pub async fn approve_doctor(&self, session: &Session, doctor_id: DoctorId) -> Result<Doctor, DoctorError> {
        self.decide(session, doctor_id, DoctorStatus::Approved).await
    }

    pub async fn reject_doctor(&self, session: &Session, doctor_id: DoctorId) -> Result<Doctor, DoctorError> {
        self.decide(session, doctor_id, DoctorStatus::Rejected).await
    }

    async fn decide(
        &self,
        session: &Session,
        doctor_id: DoctorId,
        target: DoctorStatus,
    ) -> Result<Doctor, DoctorError> {
        self.approval.authorize_decision(session)?;

        let doctor = self.get_doctor(session, doctor_id).await?;
        self.approval.validate_status_transition(doctor.status, target)?;

        let action = match target {
            DoctorStatus::Approved => "approve",
            _ => "reject",
        };

        let updated: Doctor = self
            .client
            .request(
                Method::POST,
                &format!("/doctors/{}/{}", doctor_id, action),
                session,
                None,
            )
            .await
            .map_err(|e| not_found_as(doctor_id, e))?;

        info!("Doctor {} is now {}", doctor_id, updated.status);
        Ok(updated)
    }

    pub async fn update_availability(
        &self,
        session: &Session,
        doctor_id: DoctorId,
        available: bool,
    ) -> Result<(), DoctorError> {
        let doctor = self.get_doctor(session, doctor_id).await?;
        self.approval.validate_availability_change(session, &doctor)?;

        self.client
            .request_empty(
                Method::PUT,
                &format!("/doctors/{}/availability", doctor_id),
                session,
                Some(json!({ "available": available })),
            )
            .await
            .map_err(|e| not_found_as(doctor_id, e))?;

        info!("Doctor {} availability set to {}", doctor_id, available);
        Ok(())
    }
}

fn not_found_as(doctor_id: DoctorId, err: ServiceError) -> DoctorError {
    match err {
        ServiceError::NotFound(_) => DoctorError::NotFound(doctor_id),
        other => DoctorError::Service(other),
    }
}
