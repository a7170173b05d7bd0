use std::sync::Arc;

use axum::http::HeaderValue;
use chrono::Utc;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{
    Session, ADMIN_PASSCODE_HEADER, DOCTOR_ID_HEADER, REGISTRATION_CODE_HEADER,
};

use crate::passcode::hash_passcode;

pub const TEST_ADMIN_PASSCODE: &str = "test-admin-passcode";
pub const TEST_REGISTRATION_CODE: &str = "REG-123456";

pub struct TestConfig {
    pub coordination_url: String,
    pub coordination_api_key: String,
    pub admin_passcode: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            coordination_url: "http://localhost:4943".to_string(),
            coordination_api_key: "test-api-key".to_string(),
            admin_passcode: TEST_ADMIN_PASSCODE.to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            coordination_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            coordination_url: self.coordination_url.clone(),
            coordination_api_key: self.coordination_api_key.clone(),
            admin_passcode_hash: hash_passcode(&self.admin_passcode),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestSession;

impl TestSession {
    pub fn admin() -> Session {
        Session::admin(TEST_ADMIN_PASSCODE)
    }

    pub fn doctor(doctor_id: u64) -> Session {
        Session::doctor(doctor_id, TEST_REGISTRATION_CODE)
    }

    /// Header pairs a gateway client would send for the given session.
    pub fn headers(session: &Session) -> Vec<(&'static str, HeaderValue)> {
        match session {
            Session::Anonymous => Vec::new(),
            Session::Admin { passcode } => vec![(
                ADMIN_PASSCODE_HEADER,
                HeaderValue::from_str(passcode).unwrap(),
            )],
            Session::Doctor { doctor_id, registration_code } => vec![
                (DOCTOR_ID_HEADER, HeaderValue::from(*doctor_id)),
                (
                    REGISTRATION_CODE_HEADER,
                    HeaderValue::from_str(registration_code).unwrap(),
                ),
            ],
        }
    }
}

/// JSON bodies shaped like the coordination service's answers.
pub struct MockCoordinationResponses;

impl MockCoordinationResponses {
    pub fn doctor_response(id: u64, department: &str, status: &str, available: bool) -> Value {
        json!({
            "id": id,
            "name": format!("Dr. Test {}", id),
            "department": department,
            "status": status,
            "available": available,
            "contact_info": format!("doctor{}@example.com", id),
            "registration_code": TEST_REGISTRATION_CODE,
            "registration_date": "2024-01-01T00:00:00Z",
            "years_of_experience": 10,
            "certifications": ["Board Certified"]
        })
    }

    pub fn case_response(
        id: u64,
        case_type: &str,
        severity: &str,
        status: &str,
        assigned_doctor_id: Option<u64>,
    ) -> Value {
        json!({
            "id": id,
            "patient_name": format!("Patient {}", id),
            "patient_details": "Age 54, no known allergies",
            "condition": "Chest pain radiating to left arm",
            "case_type": case_type,
            "severity": severity,
            "status": status,
            "assigned_doctor_id": assigned_doctor_id,
            "submission_date": Utc::now().to_rfc3339()
        })
    }

    pub fn login_success(id: u64, department: &str) -> Value {
        json!({
            "outcome": "success",
            "doctor": Self::doctor_response(id, department, "approved", true)
        })
    }

    pub fn login_outcome(outcome: &str) -> Value {
        json!({ "outcome": outcome })
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "error": message })
    }
}
