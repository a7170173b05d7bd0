use case_cell::models::{CaseStatus, EmergencyCase};
use doctor_cell::models::{Doctor, DoctorStatus};

use crate::models::{DashboardStats, Snapshot};

/// Reduce a snapshot to its dashboard counters. Order of the input does not
/// matter.
pub fn project(snapshot: &Snapshot) -> DashboardStats {
    project_collections(&snapshot.doctors, &snapshot.cases)
}

pub fn project_collections(doctors: &[Doctor], cases: &[EmergencyCase]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_doctors: doctors.len(),
        total_cases: cases.len(),
        ..DashboardStats::default()
    };

    for doctor in doctors {
        match doctor.status {
            DoctorStatus::Approved => {
                stats.approved_doctor_count += 1;
                if doctor.available {
                    stats.available_doctor_count += 1;
                }
            }
            DoctorStatus::PendingApproval => stats.pending_approval_count += 1,
            DoctorStatus::Rejected => {}
        }
    }

    for case in cases {
        match case.status {
            CaseStatus::Open => stats.total_open += 1,
            CaseStatus::Assigned => stats.total_assigned += 1,
            CaseStatus::InProgress => stats.total_in_progress += 1,
            CaseStatus::Resolved | CaseStatus::Closed => continue,
        }

        stats.total_active += 1;
        *stats.active_by_department.entry(case.case_type).or_insert(0) += 1;

        if case.is_critical() {
            stats.total_critical += 1;
        }
        if case.has_pending_status_update() {
            stats.awaiting_status_update += 1;
        }
    }

    stats
}
