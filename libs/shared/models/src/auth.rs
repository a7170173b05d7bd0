use std::fmt;

pub const ADMIN_PASSCODE_HEADER: &str = "x-admin-passcode";
pub const DOCTOR_ID_HEADER: &str = "x-doctor-id";
pub const REGISTRATION_CODE_HEADER: &str = "x-registration-code";

/// Who is calling the gateway. Built once per request by the session
/// middleware and handed to the services explicitly.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Admin {
        passcode: String,
    },
    Doctor {
        doctor_id: u64,
        registration_code: String,
    },
}

impl Session {
    pub fn admin(passcode: impl Into<String>) -> Self {
        Session::Admin {
            passcode: passcode.into(),
        }
    }

    pub fn doctor(doctor_id: u64, registration_code: impl Into<String>) -> Self {
        Session::Doctor {
            doctor_id,
            registration_code: registration_code.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Session::Admin { .. })
    }

    pub fn doctor_id(&self) -> Option<u64> {
        match self {
            Session::Doctor { doctor_id, .. } => Some(*doctor_id),
            _ => None,
        }
    }

    /// True for admins and for the doctor whose id matches.
    pub fn acts_for_doctor(&self, doctor_id: u64) -> bool {
        self.is_admin() || self.doctor_id() == Some(doctor_id)
    }
}

// Secrets never reach the logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Anonymous => write!(f, "Session::Anonymous"),
            Session::Admin { .. } => write!(f, "Session::Admin {{ passcode: <redacted> }}"),
            Session::Doctor { doctor_id, .. } => write!(
                f,
                "Session::Doctor {{ doctor_id: {}, registration_code: <redacted> }}",
                doctor_id
            ),
        }
    }
}
