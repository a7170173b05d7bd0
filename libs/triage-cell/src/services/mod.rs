pub mod monitor;
pub mod symptoms;
pub mod vitals;

pub use monitor::VitalsMonitor;
pub use symptoms::{KeywordSymptomChecker, SymptomChecker};
pub use vitals::{SimulatedVitals, VitalsSource};
