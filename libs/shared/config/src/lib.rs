use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub coordination_url: String,
    pub coordination_api_key: String,
    pub admin_passcode_hash: String,
    pub request_timeout_secs: u64,
    pub read_retry_attempts: u32,
    pub dashboard_poll_secs: u64,
    pub vitals_poll_secs: u64,
    pub enforce_department_match: bool,
    pub mark_assigned_on_assign: bool,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            coordination_url: String::new(),
            coordination_api_key: String::new(),
            admin_passcode_hash: String::new(),
            request_timeout_secs: 10,
            read_retry_attempts: 1,
            dashboard_poll_secs: 5,
            vitals_poll_secs: 30,
            enforce_department_match: true,
            mark_assigned_on_assign: false,
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            coordination_url: env::var("COORDINATION_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("COORDINATION_SERVICE_URL not set, using empty value");
                    String::new()
                }),
            coordination_api_key: env::var("COORDINATION_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("COORDINATION_API_KEY not set, using empty value");
                    String::new()
                }),
            admin_passcode_hash: env::var("ADMIN_PASSCODE_HASH")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSCODE_HASH not set, admin sessions are disabled");
                    String::new()
                }),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            read_retry_attempts: parse_or("READ_RETRY_ATTEMPTS", defaults.read_retry_attempts),
            dashboard_poll_secs: parse_or("DASHBOARD_POLL_SECS", defaults.dashboard_poll_secs),
            vitals_poll_secs: parse_or("VITALS_POLL_SECS", defaults.vitals_poll_secs),
            enforce_department_match: parse_or(
                "ENFORCE_DEPARTMENT_MATCH",
                defaults.enforce_department_match,
            ),
            mark_assigned_on_assign: parse_or(
                "MARK_ASSIGNED_ON_ASSIGN",
                defaults.mark_assigned_on_assign,
            ),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.coordination_url.is_empty() && !self.admin_passcode_hash.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn dashboard_poll_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_poll_secs.max(1))
    }

    pub fn vitals_poll_interval(&self) -> Duration {
        Duration::from_secs(self.vitals_poll_secs.max(1))
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
