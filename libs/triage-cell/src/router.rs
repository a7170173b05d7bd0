use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::session_middleware;

use crate::handlers::*;
use crate::services::{
    KeywordSymptomChecker, SimulatedVitals, SymptomChecker, VitalsMonitor, VitalsSource,
};

#[derive(Clone)]
pub struct TriageState {
    pub config: Arc<AppConfig>,
    pub checker: Arc<dyn SymptomChecker>,
    pub monitor: Arc<VitalsMonitor>,
}

impl TriageState {
    pub fn new(
        config: Arc<AppConfig>,
        checker: Arc<dyn SymptomChecker>,
        vitals: Arc<dyn VitalsSource>,
    ) -> Self {
        let monitor = Arc::new(VitalsMonitor::new(vitals, config.vitals_poll_interval()));
        Self {
            config,
            checker,
            monitor,
        }
    }

    /// Keyword checker with simulated vitals.
    pub fn with_defaults(config: Arc<AppConfig>) -> Self {
        Self::new(
            config,
            Arc::new(KeywordSymptomChecker::new()),
            Arc::new(SimulatedVitals::new()),
        )
    }
}

pub fn triage_routes(state: TriageState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/symptoms", post(check_symptoms))
        .route("/vitals/{case_id}", get(get_case_vitals))
        .layer(middleware::from_fn_with_state(config, session_middleware))
        .with_state(state)
}
