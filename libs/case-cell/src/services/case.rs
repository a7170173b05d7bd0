use std::cmp::Reverse;

use serde_json::json;
use tracing::{debug, info, warn};

use doctor_cell::models::{Department, Doctor, DoctorId};
use doctor_cell::services::DoctorService;
use shared_config::AppConfig;
use shared_database::{CoordinationClient, Method, ServiceError};
use shared_models::auth::Session;

use crate::models::{
    CaseError, CaseFilters, CaseId, CaseStatus, EmergencyCase, SubmitCaseRequest,
};
use crate::services::assignment::AssignmentRule;
use crate::services::lifecycle::CaseLifecycleService;

#[derive(Clone)]
pub struct CaseService {
    client: CoordinationClient,
    doctors: DoctorService,
    lifecycle: CaseLifecycleService,
    assignment: AssignmentRule,
    mark_assigned_on_assign: bool,
}

impl CaseService {
    pub fn new(config: &AppConfig) -> Self {
        let client = CoordinationClient::new(config);

        Self {
            doctors: DoctorService::with_client(client.clone()),
            client,
            lifecycle: CaseLifecycleService::new(),
            assignment: AssignmentRule::new(config.enforce_department_match),
            mark_assigned_on_assign: config.mark_assigned_on_assign,
        }
    }

    /// Patient submission; the service stores the case as `open`.
    pub async fn submit_case(&self, request: SubmitCaseRequest) -> Result<EmergencyCase, CaseError> {
        let request = normalize_submission(request)?;
        debug!("Submitting {} {} case for {}", request.severity, request.case_type, request.patient_name);

        let case: EmergencyCase = self
            .client
            .request(Method::POST, "/cases", &Session::Anonymous, Some(json!(request)))
            .await?;

        if case.status != CaseStatus::Open {
            warn!("Coordination service created case {} as {}", case.id, case.status);
        }

        info!("Case {} submitted ({} / {})", case.id, case.case_type, case.severity);
        Ok(case)
    }

    pub async fn get_case(&self, session: &Session, case_id: CaseId) -> Result<EmergencyCase, CaseError> {
        debug!("Fetching case {}", case_id);

        self.client
            .request(Method::GET, &format!("/cases/{}", case_id), session, None)
            .await
            .map_err(|e| case_error(case_id, e))
    }

    pub async fn all_cases(&self, session: &Session) -> Result<Vec<EmergencyCase>, CaseError> {
        Ok(self.client.request(Method::GET, "/cases", session, None).await?)
    }

    /// Filtered listing, most severe first and oldest first within a severity.
    pub async fn list_cases(
        &self,
        session: &Session,
        filters: &CaseFilters,
    ) -> Result<Vec<EmergencyCase>, CaseError> {
        debug!("Listing cases with filters: {:?}", filters);

        let mut cases: Vec<EmergencyCase> = self
            .all_cases(session)
            .await?
            .into_iter()
            .filter(|c| filters.matches(c))
            .collect();
        cases.sort_by_key(|c| (Reverse(c.severity), c.submission_date, c.id));

        Ok(cases)
    }

    /// Active cases of one department, as seen from a doctor's dashboard.
    pub async fn cases_for_department(
        &self,
        session: &Session,
        department: Department,
    ) -> Result<Vec<EmergencyCase>, CaseError> {
        self.list_cases(
            session,
            &CaseFilters {
                case_type: Some(department),
                active_only: Some(true),
                ..CaseFilters::default()
            },
        )
        .await
    }

    pub async fn update_case_status(
        &self,
        session: &Session,
        case_id: CaseId,
        new_status: CaseStatus,
    ) -> Result<EmergencyCase, CaseError> {
        let case = self.get_case(session, case_id).await?;

        self.lifecycle.authorize_status_update(session, &case)?;
        self.lifecycle.validate_status_transition(&case, new_status)?;

        let updated = self.put_status(session, case_id, new_status).await?;

        info!("Case {} status {} -> {}", case_id, case.status, updated.status);
        Ok(updated)
    }

    /// Attach a doctor. The status is left alone unless the gateway is
    /// configured to follow up with a separate `assigned` status update.
    pub async fn assign_doctor(
        &self,
        session: &Session,
        case_id: CaseId,
        doctor_id: DoctorId,
    ) -> Result<EmergencyCase, CaseError> {
        require_admin(session, "assign doctors")?;

        let case = self.get_case(session, case_id).await?;
        self.lifecycle.ensure_mutable(&case)?;

        let doctor = self.doctors.get_doctor(session, doctor_id).await?;
        self.assignment.validate(&case, &doctor)?;

        let updated: EmergencyCase = self
            .client
            .request(
                Method::PUT,
                &format!("/cases/{}/doctor", case_id),
                session,
                Some(json!({ "doctor_id": doctor_id })),
            )
            .await
            .map_err(|e| case_error(case_id, e))?;

        info!("Doctor {} assigned to case {}", doctor_id, case_id);

        if self.mark_assigned_on_assign {
            if let Some(next) = self.lifecycle.status_after_assignment(updated.status) {
                // Second, independent call: the doctor stays attached if it fails.
                return self.put_status(session, case_id, next).await;
            }
        }

        if updated.has_pending_status_update() {
            debug!("Case {} has a doctor but is still open", case_id);
        }

        Ok(updated)
    }

    pub async fn assignment_candidates(
        &self,
        session: &Session,
        case_id: CaseId,
    ) -> Result<Vec<Doctor>, CaseError> {
        require_admin(session, "list assignment candidates")?;

        let case = self.get_case(session, case_id).await?;
        let doctors = self.doctors.list_doctors(session).await?;

        Ok(self
            .assignment
            .candidates(&case, &doctors)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn delete_case(&self, session: &Session, case_id: CaseId) -> Result<(), CaseError> {
        require_admin(session, "delete cases")?;

        self.client
            .request_empty(Method::DELETE, &format!("/cases/{}", case_id), session, None)
            .await
            .map_err(|e| case_error(case_id, e))?;

        info!("Case {} deleted", case_id);
        Ok(())
    }

    async fn put_status(
        &self,
        session: &Session,
        case_id: CaseId,
        status: CaseStatus,
    ) -> Result<EmergencyCase, CaseError> {
        self.client
            .request(
                Method::PUT,
                &format!("/cases/{}/status", case_id),
                session,
                Some(json!({ "status": status })),
            )
            .await
            .map_err(|e| case_error(case_id, e))
    }
}

fn require_admin(session: &Session, action: &str) -> Result<(), CaseError> {
    if !session.is_admin() {
        return Err(CaseError::Unauthorized(format!("Only admins may {}", action)));
    }
    Ok(())
}

fn normalize_submission(mut request: SubmitCaseRequest) -> Result<SubmitCaseRequest, CaseError> {
    request.patient_name = request.patient_name.trim().to_string();
    request.condition = request.condition.trim().to_string();
    request.patient_details = request.patient_details.trim().to_string();

    if request.patient_name.is_empty() {
        return Err(CaseError::ValidationError("Patient name is required".to_string()));
    }
    if request.condition.is_empty() {
        return Err(CaseError::ValidationError("Condition is required".to_string()));
    }

    Ok(request)
}

// The service answers 409 when a case was closed underneath us.
fn case_error(case_id: CaseId, err: ServiceError) -> CaseError {
    match err {
        ServiceError::NotFound(_) => CaseError::NotFound(case_id),
        ServiceError::Conflict(_) => CaseError::CaseClosed(case_id),
        other => CaseError::Service(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use doctor_cell::models::Department;

    use crate::models::Severity;

    #[test]
    fn submission_requires_name_and_condition() {
        let request = SubmitCaseRequest {
            patient_name: "  ".to_string(),
            patient_details: String::new(),
            condition: "Fracture".to_string(),
            case_type: Department::Orthopedics,
            severity: Severity::Medium,
        };

        assert_matches!(normalize_submission(request), Err(CaseError::ValidationError(_)));
    }

    #[test]
    fn conflict_from_service_means_case_closed() {
        assert_matches!(
            case_error(5, ServiceError::Conflict("closed".to_string())),
            CaseError::CaseClosed(5)
        );
        assert_matches!(
            case_error(5, ServiceError::NotFound("gone".to_string())),
            CaseError::NotFound(5)
        );
    }
}
