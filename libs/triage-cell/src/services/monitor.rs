use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use case_cell::models::{CaseId, EmergencyCase};

use crate::models::{TriageError, VitalSigns};
use crate::services::vitals::VitalsSource;

/// Latest reading per active case. A reading is reused until it is older
/// than the refresh period.
pub struct VitalsMonitor {
    source: Arc<dyn VitalsSource>,
    readings: RwLock<HashMap<CaseId, VitalSigns>>,
    refresh: Duration,
}

impl VitalsMonitor {
    pub fn new(source: Arc<dyn VitalsSource>, refresh: Duration) -> Self {
        Self {
            source,
            readings: RwLock::new(HashMap::new()),
            refresh,
        }
    }

    pub async fn vitals_for(&self, case: &EmergencyCase) -> Result<VitalSigns, TriageError> {
        if !case.is_active() {
            self.readings.write().await.remove(&case.id);
            return Err(TriageError::NotMonitored(case.id));
        }

        if let Some(reading) = self.readings.read().await.get(&case.id) {
            if self.is_fresh(reading) {
                return Ok(reading.clone());
            }
        }

        let reading = self.source.read(case).await?;
        debug!("New vitals reading for case {}", case.id);

        let mut readings = self.readings.write().await;
        // Cases that are no longer queried (deleted, closed elsewhere) age out here.
        readings.retain(|_, r| self.is_fresh(r));
        readings.insert(case.id, reading.clone());

        Ok(reading)
    }

    fn is_fresh(&self, reading: &VitalSigns) -> bool {
        let age = Utc::now().signed_duration_since(reading.recorded_at);
        age.to_std().map_or(true, |age| age < self.refresh)
    }

    pub async fn monitored_cases(&self) -> usize {
        self.readings.read().await.len()
    }
}
