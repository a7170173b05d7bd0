use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::auth::{
    Session, ADMIN_PASSCODE_HEADER, DOCTOR_ID_HEADER, REGISTRATION_CODE_HEADER,
};

use crate::error::ServiceError;

/// HTTP client for the external coordination service. Every call is a single
/// request/response; the caller's session is forwarded as headers so the
/// service can make its own authorization decision.
#[derive(Clone)]
pub struct CoordinationClient {
    client: Client,
    base_url: String,
    api_key: String,
    read_retry_attempts: u32,
}

impl CoordinationClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.coordination_url.trim_end_matches('/').to_string(),
            api_key: config.coordination_api_key.clone(),
            read_retry_attempts: config.read_retry_attempts,
        }
    }

    fn get_headers(&self, session: &Session) -> Result<HeaderMap, ServiceError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !self.api_key.is_empty() {
            headers.insert(
                "apikey",
                HeaderValue::from_str(&self.api_key)
                    .map_err(|_| ServiceError::InvalidHeader("apikey"))?,
            );
        }

        match session {
            Session::Anonymous => {}
            Session::Admin { passcode } => {
                headers.insert(
                    ADMIN_PASSCODE_HEADER,
                    HeaderValue::from_str(passcode)
                        .map_err(|_| ServiceError::InvalidHeader(ADMIN_PASSCODE_HEADER))?,
                );
            }
            Session::Doctor { doctor_id, registration_code } => {
                headers.insert(DOCTOR_ID_HEADER, HeaderValue::from(*doctor_id));
                headers.insert(
                    REGISTRATION_CODE_HEADER,
                    HeaderValue::from_str(registration_code)
                        .map_err(|_| ServiceError::InvalidHeader(REGISTRATION_CODE_HEADER))?,
                );
            }
        }

        Ok(headers)
    }

    /// Issue a request and decode the JSON body. Reads are retried up to the
    /// configured number of times when the failure is transient; writes are
    /// sent exactly once.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: Option<Value>,
    ) -> Result<T, ServiceError>
    where
        T: DeserializeOwned,
    {
        let text = self.request_text(method, path, session, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Same as [`request`](Self::request) for endpoints that answer without a body.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: Option<Value>,
    ) -> Result<(), ServiceError> {
        self.request_text(method, path, session, body).await.map(|_| ())
    }

    async fn request_text(
        &self,
        method: Method,
        path: &str,
        session: &Session,
        body: Option<Value>,
    ) -> Result<String, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let headers = self.get_headers(session)?;

        let retries = if method == Method::GET { self.read_retry_attempts } else { 0 };
        let mut attempt = 0;

        loop {
            debug!("Making {} request to {} (attempt {})", method, url, attempt + 1);

            match self.send_once(method.clone(), &url, headers.clone(), body.as_ref()).await {
                Err(e) if e.is_retryable() && attempt < retries => {
                    warn!("Retrying {} {} after error: {}", method, url, e);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<&Value>,
    ) -> Result<String, ServiceError> {
        let mut req = self.client.request(method, url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Coordination service error ({}): {}", status, text);
            return Err(ServiceError::from_status(status.as_u16(), extract_message(&text)));
        }

        Ok(text)
    }
}

/// Error bodies are either `{"error": "..."}`, `{"message": "..."}` or plain text.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
