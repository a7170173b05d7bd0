use std::ops::RangeInclusive;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};

use case_cell::models::{EmergencyCase, Severity};

use crate::models::{TriageError, VitalSigns};

#[async_trait]
pub trait VitalsSource: Send + Sync {
    async fn read(&self, case: &EmergencyCase) -> Result<VitalSigns, TriageError>;
}

struct VitalRanges {
    heart_rate: RangeInclusive<u16>,
    systolic_bp: RangeInclusive<u16>,
    diastolic_bp: RangeInclusive<u16>,
    respiratory_rate: RangeInclusive<u8>,
    oxygen_saturation: RangeInclusive<u8>,
    temperature_c: RangeInclusive<f32>,
}

fn ranges_for(severity: Severity) -> VitalRanges {
    match severity {
        Severity::Low => VitalRanges {
            heart_rate: 60..=90,
            systolic_bp: 110..=130,
            diastolic_bp: 70..=85,
            respiratory_rate: 12..=18,
            oxygen_saturation: 96..=100,
            temperature_c: 36.4..=37.4,
        },
        Severity::Medium => VitalRanges {
            heart_rate: 70..=105,
            systolic_bp: 105..=145,
            diastolic_bp: 65..=92,
            respiratory_rate: 14..=22,
            oxygen_saturation: 94..=99,
            temperature_c: 36.5..=38.2,
        },
        Severity::High => VitalRanges {
            heart_rate: 90..=125,
            systolic_bp: 95..=165,
            diastolic_bp: 60..=100,
            respiratory_rate: 18..=26,
            oxygen_saturation: 90..=96,
            temperature_c: 36.8..=39.0,
        },
        Severity::Critical => VitalRanges {
            heart_rate: 110..=150,
            systolic_bp: 80..=190,
            diastolic_bp: 50..=115,
            respiratory_rate: 22..=32,
            oxygen_saturation: 84..=93,
            temperature_c: 35.0..=40.2,
        },
    }
}

/// Generates plausible readings for demos. Ranges widen with severity.
pub struct SimulatedVitals {
    rng: Mutex<StdRng>,
}

impl SimulatedVitals {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SimulatedVitals {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VitalsSource for SimulatedVitals {
    async fn read(&self, case: &EmergencyCase) -> Result<VitalSigns, TriageError> {
        let ranges = ranges_for(case.severity);
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| TriageError::VitalsUnavailable("vitals generator poisoned".to_string()))?;

        let temperature: f32 = rng.gen_range(ranges.temperature_c);

        Ok(VitalSigns {
            case_id: case.id,
            heart_rate: rng.gen_range(ranges.heart_rate),
            systolic_bp: rng.gen_range(ranges.systolic_bp),
            diastolic_bp: rng.gen_range(ranges.diastolic_bp),
            respiratory_rate: rng.gen_range(ranges.respiratory_rate),
            oxygen_saturation: rng.gen_range(ranges.oxygen_saturation),
            temperature_c: (temperature * 10.0).round() / 10.0,
            recorded_at: Utc::now(),
        })
    }
}
