use crate::models::{DoctorError, RegisterDoctorRequest};

pub const MIN_REGISTRATION_CODE_LEN: usize = 6;
pub const MAX_YEARS_OF_EXPERIENCE: u32 = 70;

/// Registration codes travel as a request header on every doctor call, so
/// they must be printable ASCII without whitespace.
pub fn validate_registration_code(code: &str) -> Result<(), DoctorError> {
    if code.len() < MIN_REGISTRATION_CODE_LEN {
        return Err(DoctorError::InvalidRegistrationCode(format!(
            "must be at least {} characters",
            MIN_REGISTRATION_CODE_LEN
        )));
    }

    if !code.chars().all(|c| c.is_ascii_graphic()) {
        return Err(DoctorError::InvalidRegistrationCode(
            "must contain printable ASCII characters only".to_string(),
        ));
    }

    Ok(())
}

/// Check and normalize a registration before it is sent to the service.
pub fn normalize_registration(
    mut request: RegisterDoctorRequest,
) -> Result<RegisterDoctorRequest, DoctorError> {
    request.name = request.name.trim().to_string();
    request.contact_info = request.contact_info.trim().to_string();

    if request.name.is_empty() {
        return Err(DoctorError::ValidationError("Doctor name is required".to_string()));
    }
    if request.contact_info.is_empty() {
        return Err(DoctorError::ValidationError("Contact information is required".to_string()));
    }

    validate_registration_code(&request.registration_code)?;

    if let Some(years) = request.years_of_experience {
        if years > MAX_YEARS_OF_EXPERIENCE {
            return Err(DoctorError::ValidationError(format!(
                "Years of experience must be at most {}",
                MAX_YEARS_OF_EXPERIENCE
            )));
        }
    }

    request.certifications = request.certifications.map(|certs| {
        certs
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    });

    Ok(request)
}
