pub mod approval;
pub mod doctor;
pub mod registration;

pub use approval::DoctorApprovalService;
pub use doctor::DoctorService;
