pub mod assignment;
pub mod case;
pub mod lifecycle;

pub use assignment::AssignmentRule;
pub use case::CaseService;
pub use lifecycle::CaseLifecycleService;
