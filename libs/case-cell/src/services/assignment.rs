use std::cmp::Reverse;

use tracing::{debug, warn};

use doctor_cell::models::Doctor;

use crate::models::{CaseError, EmergencyCase};

/// Which doctors may be attached to which cases.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentRule {
    pub enforce_department_match: bool,
}

impl Default for AssignmentRule {
    fn default() -> Self {
        Self {
            enforce_department_match: true,
        }
    }
}

impl AssignmentRule {
    pub fn new(enforce_department_match: bool) -> Self {
        Self { enforce_department_match }
    }

    pub fn validate(&self, case: &EmergencyCase, doctor: &Doctor) -> Result<(), CaseError> {
        debug!("Validating assignment of doctor {} to case {}", doctor.id, case.id);

        if case.status.is_terminal() {
            return Err(CaseError::CaseClosed(case.id));
        }

        if !doctor.is_approved() {
            warn!("Doctor {} is {} and cannot take cases", doctor.id, doctor.status);
            return Err(CaseError::InvalidAssignment(format!(
                "doctor {} is not approved",
                doctor.id
            )));
        }

        if !doctor.available {
            return Err(CaseError::InvalidAssignment(format!(
                "doctor {} is not available",
                doctor.id
            )));
        }

        if doctor.department != case.case_type {
            if self.enforce_department_match {
                return Err(CaseError::InvalidAssignment(format!(
                    "doctor {} works in {}, case {} needs {}",
                    doctor.id, doctor.department, case.id, case.case_type
                )));
            }
            warn!(
                "Cross-department assignment: doctor {} ({}) to case {} ({})",
                doctor.id, doctor.department, case.id, case.case_type
            );
        }

        Ok(())
    }

    /// Doctors that could take the case, most experienced first.
    pub fn candidates<'a>(&self, case: &EmergencyCase, doctors: &'a [Doctor]) -> Vec<&'a Doctor> {
        if case.status.is_terminal() {
            return Vec::new();
        }

        let mut candidates: Vec<&Doctor> = doctors
            .iter()
            .filter(|d| d.is_available() && d.department == case.case_type)
            .collect();

        candidates.sort_by_key(|d| (Reverse(d.years_of_experience.unwrap_or(0)), d.id));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use doctor_cell::models::{Department, DoctorStatus};

    use crate::models::{CaseStatus, Severity};

    fn doctor(id: u64, department: Department, status: DoctorStatus, available: bool, years: Option<u32>) -> Doctor {
        Doctor {
            id,
            name: format!("Dr. {}", id),
            department,
            status,
            available,
            contact_info: String::new(),
            registration_code: String::new(),
            registration_date: Utc::now(),
            years_of_experience: years,
            certifications: vec![],
        }
    }

    fn cardiology_case(status: CaseStatus) -> EmergencyCase {
        EmergencyCase {
            id: 7,
            patient_name: "Sam Lee".to_string(),
            patient_details: "Age 47".to_string(),
            condition: "Palpitations".to_string(),
            case_type: Department::Cardiology,
            severity: Severity::Critical,
            status,
            assigned_doctor_id: None,
            submission_date: Utc::now(),
        }
    }

    #[test]
    fn approved_available_same_department_is_valid() {
        let rule = AssignmentRule::default();
        let doc = doctor(1, Department::Cardiology, DoctorStatus::Approved, true, Some(5));

        assert!(rule.validate(&cardiology_case(CaseStatus::Open), &doc).is_ok());
    }

    #[test]
    fn closed_case_wins_over_other_failures() {
        let rule = AssignmentRule::default();
        let doc = doctor(1, Department::Neurology, DoctorStatus::PendingApproval, false, None);

        assert_matches!(
            rule.validate(&cardiology_case(CaseStatus::Closed), &doc),
            Err(CaseError::CaseClosed(7))
        );
    }

    #[test]
    fn unapproved_or_unavailable_doctor_is_invalid() {
        let rule = AssignmentRule::default();
        let case = cardiology_case(CaseStatus::Open);

        for doc in [
            doctor(1, Department::Cardiology, DoctorStatus::PendingApproval, true, None),
            doctor(2, Department::Cardiology, DoctorStatus::Rejected, true, None),
            doctor(3, Department::Cardiology, DoctorStatus::Approved, false, None),
        ] {
            assert_matches!(rule.validate(&case, &doc), Err(CaseError::InvalidAssignment(_)));
        }
    }

    #[test]
    fn department_mismatch_depends_on_enforcement() {
        let doc = doctor(4, Department::Neurology, DoctorStatus::Approved, true, None);
        let case = cardiology_case(CaseStatus::Assigned);

        assert_matches!(
            AssignmentRule::new(true).validate(&case, &doc),
            Err(CaseError::InvalidAssignment(_))
        );
        assert!(AssignmentRule::new(false).validate(&case, &doc).is_ok());
    }

    #[test]
    fn candidates_are_filtered_and_ordered_by_experience() {
        let rule = AssignmentRule::default();
        let doctors = vec![
            doctor(1, Department::Cardiology, DoctorStatus::Approved, true, Some(3)),
            doctor(2, Department::Cardiology, DoctorStatus::Approved, true, Some(15)),
            doctor(3, Department::Cardiology, DoctorStatus::PendingApproval, true, Some(30)),
            doctor(4, Department::Neurology, DoctorStatus::Approved, true, Some(20)),
            doctor(5, Department::Cardiology, DoctorStatus::Approved, false, Some(25)),
            doctor(6, Department::Cardiology, DoctorStatus::Approved, true, Some(3)),
        ];

        let ids: Vec<u64> = rule
            .candidates(&cardiology_case(CaseStatus::Open), &doctors)
            .iter()
            .map(|d| d.id)
            .collect();

        assert_eq!(ids, vec![2, 1, 6]);
        assert!(rule.candidates(&cardiology_case(CaseStatus::Closed), &doctors).is_empty());
    }
}
