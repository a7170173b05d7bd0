use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::auth::{
    Session, ADMIN_PASSCODE_HEADER, DOCTOR_ID_HEADER, REGISTRATION_CODE_HEADER,
};
use shared_models::error::AppError;

use crate::passcode::verify_passcode;

// Middleware that resolves the caller's session; anonymous callers pass through
pub async fn session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = session_from_headers(request.headers(), &config)?;
    debug!("Resolved session: {:?}", session);

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

pub fn session_from_headers(headers: &HeaderMap, config: &AppConfig) -> Result<Session, AppError> {
    if let Some(passcode) = header_str(headers, ADMIN_PASSCODE_HEADER)? {
        if !verify_passcode(passcode, &config.admin_passcode_hash) {
            warn!("Rejected admin session with invalid passcode");
            return Err(AppError::Auth("Invalid admin passcode".to_string()));
        }
        return Ok(Session::admin(passcode));
    }

    if let Some(raw_id) = header_str(headers, DOCTOR_ID_HEADER)? {
        let doctor_id = raw_id
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::Auth("Invalid doctor id header".to_string()))?;

        let code = header_str(headers, REGISTRATION_CODE_HEADER)?
            .ok_or_else(|| AppError::Auth("Missing registration code header".to_string()))?;

        return Ok(Session::doctor(doctor_id, code));
    }

    Ok(Session::Anonymous)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| AppError::Auth(format!("Invalid {} header format", name))),
    }
}
