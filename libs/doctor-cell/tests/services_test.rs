// libs/doctor-cell/tests/services_test.rs
use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doctor_cell::models::*;
use doctor_cell::services::DoctorService;
use shared_models::auth::{Session, ADMIN_PASSCODE_HEADER};
use shared_utils::test_utils::{
    MockCoordinationResponses, TestConfig, TestSession, TEST_ADMIN_PASSCODE,
};

async fn setup() -> (MockServer, DoctorService) {
    let mock_server = MockServer::start().await;
    let config = TestConfig::with_url(mock_server.uri()).to_app_config();
    (mock_server, DoctorService::new(&config))
}

async fn mount_doctor(mock_server: &MockServer, id: u64, department: &str, status: &str, available: bool) {
    Mock::given(method("GET"))
        .and(path(format!("/doctors/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockCoordinationResponses::doctor_response(id, department, status, available),
        ))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_register_doctor_starts_pending() {
    let (mock_server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/doctors"))
        .and(body_partial_json(json!({
            "name": "Dr. Lena Park",
            "department": "cardiology",
            "registration_code": "CARD-2024"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            MockCoordinationResponses::doctor_response(21, "cardiology", "pending_approval", false),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let doctor = service
        .register_doctor(RegisterDoctorRequest {
            name: " Dr. Lena Park ".to_string(),
            department: Department::Cardiology,
            contact_info: "lena@example.com".to_string(),
            registration_code: "CARD-2024".to_string(),
            years_of_experience: Some(12),
            certifications: None,
        })
        .await
        .unwrap();

    assert_eq!(doctor.id, 21);
    assert_eq!(doctor.status, DoctorStatus::PendingApproval);
}

#[tokio::test]
async fn test_register_with_short_code_never_reaches_service() {
    let (mock_server, service) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service
        .register_doctor(RegisterDoctorRequest {
            name: "Dr. Short".to_string(),
            department: Department::Neurology,
            contact_info: "short@example.com".to_string(),
            registration_code: "abc".to_string(),
            years_of_experience: None,
            certifications: None,
        })
        .await;

    assert_matches!(result, Err(DoctorError::InvalidRegistrationCode(_)));
}

#[tokio::test]
async fn test_login_outcomes_map_to_errors() {
    let cases = [
        ("not_approved", "NotApproved"),
        ("doctor_not_found", "DoctorNotFound"),
        ("invalid_credentials", "InvalidCredentials"),
    ];

    for (outcome, expected) in cases {
        let (mock_server, service) = setup().await;

        Mock::given(method("POST"))
            .and(path("/doctors/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(MockCoordinationResponses::login_outcome(outcome)),
            )
            .mount(&mock_server)
            .await;

        let err = service
            .login(DoctorLoginRequest {
                doctor_id: 3,
                registration_code: "REG-123456".to_string(),
            })
            .await
            .unwrap_err();

        let matched = match err {
            DoctorError::NotApproved => "NotApproved",
            DoctorError::DoctorNotFound => "DoctorNotFound",
            DoctorError::InvalidCredentials => "InvalidCredentials",
            other => panic!("unexpected error {:?}", other),
        };
        assert_eq!(matched, expected);
    }
}

#[tokio::test]
async fn test_login_success_returns_doctor() {
    let (mock_server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path("/doctors/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockCoordinationResponses::login_success(4, "emergency")),
        )
        .mount(&mock_server)
        .await;

    let doctor = service
        .login(DoctorLoginRequest {
            doctor_id: 4,
            registration_code: "REG-123456".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(doctor.id, 4);
    assert!(doctor.is_available());
}

#[tokio::test]
async fn test_approve_pending_doctor_as_admin() {
    let (mock_server, service) = setup().await;
    mount_doctor(&mock_server, 7, "cardiology", "pending_approval", false).await;

    Mock::given(method("POST"))
        .and(path("/doctors/7/approve"))
        .and(header(ADMIN_PASSCODE_HEADER, TEST_ADMIN_PASSCODE))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockCoordinationResponses::doctor_response(7, "cardiology", "approved", false),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let doctor = service.approve_doctor(&TestSession::admin(), 7).await.unwrap();

    assert_eq!(doctor.status, DoctorStatus::Approved);
}

#[tokio::test]
async fn test_approving_twice_is_rejected_locally() {
    let (mock_server, service) = setup().await;
    mount_doctor(&mock_server, 8, "cardiology", "approved", true).await;

    Mock::given(method("POST"))
        .and(path("/doctors/8/approve"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = service.reject_doctor(&TestSession::admin(), 8).await;

    assert_matches!(
        result,
        Err(DoctorError::InvalidStatusTransition {
            from: DoctorStatus::Approved,
            to: DoctorStatus::Rejected
        })
    );
}

#[tokio::test]
async fn test_doctor_cannot_approve_themself() {
    let (_mock_server, service) = setup().await;

    let result = service.approve_doctor(&TestSession::doctor(9), 9).await;

    assert_matches!(result, Err(DoctorError::Unauthorized(_)));
}

#[tokio::test]
async fn test_unknown_doctor_maps_to_not_found() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/doctors/404"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(MockCoordinationResponses::error_response("no such doctor")),
        )
        .mount(&mock_server)
        .await;

    let result = service.get_doctor(&Session::Anonymous, 404).await;

    assert_matches!(result, Err(DoctorError::NotFound(404)));
}

#[tokio::test]
async fn test_pending_doctor_cannot_toggle_availability() {
    let (mock_server, service) = setup().await;
    mount_doctor(&mock_server, 10, "pediatrics", "pending_approval", false).await;

    let result = service.update_availability(&TestSession::doctor(10), 10, true).await;

    assert_matches!(result, Err(DoctorError::NotApproved));
}

#[tokio::test]
async fn test_approved_doctor_appears_once_available() {
    let (mock_server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockCoordinationResponses::doctor_response(1, "cardiology", "approved", true),
            MockCoordinationResponses::doctor_response(2, "cardiology", "approved", false),
            MockCoordinationResponses::doctor_response(3, "cardiology", "pending_approval", true),
            MockCoordinationResponses::doctor_response(4, "neurology", "approved", true),
            MockCoordinationResponses::doctor_response(5, "cardiology", "rejected", true),
        ])))
        .mount(&mock_server)
        .await;

    let doctors = service
        .available_doctors_by_department(&Session::Anonymous, Department::Cardiology)
        .await
        .unwrap();

    let ids: Vec<u64> = doctors.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_availability_update_is_forwarded() {
    let (mock_server, service) = setup().await;
    mount_doctor(&mock_server, 12, "orthopedics", "approved", false).await;

    Mock::given(method("PUT"))
        .and(path("/doctors/12/availability"))
        .and(body_partial_json(json!({ "available": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    service
        .update_availability(&TestSession::doctor(12), 12, true)
        .await
        .unwrap();
}
