use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument};

use case_cell::models::Severity;
use doctor_cell::models::Department;

use crate::models::{SymptomReport, TriageError, TriageSuggestion};

#[async_trait]
pub trait SymptomChecker: Send + Sync {
    async fn assess(&self, report: &SymptomReport) -> Result<TriageSuggestion, TriageError>;
}

struct KeywordRule {
    keyword: &'static str,
    pattern: Regex,
    department: Department,
    severity: Severity,
}

const DEFAULT_RULES: &[(&str, &str, Department, Severity)] = &[
    ("chest pain", r"chest\s+(pain|pressure|tightness)", Department::Cardiology, Severity::Critical),
    ("cardiac arrest", r"cardiac\s+arrest|no\s+pulse", Department::Cardiology, Severity::Critical),
    ("palpitations", r"palpitation|irregular\s+heart", Department::Cardiology, Severity::Medium),
    ("stroke", r"stroke|face\s+droop|slurred\s+speech", Department::Neurology, Severity::Critical),
    ("seizure", r"seizure|convuls", Department::Neurology, Severity::High),
    ("headache", r"headache|migraine", Department::Neurology, Severity::Low),
    ("unconscious", r"unconscious|unresponsive|passed\s+out", Department::Emergency, Severity::Critical),
    ("bleeding", r"(heavy|severe|uncontrolled)\s+bleeding|hemorrhag", Department::Emergency, Severity::High),
    ("breathing", r"can'?t\s+breathe|shortness\s+of\s+breath|difficulty\s+breathing", Department::Emergency, Severity::High),
    ("fracture", r"fractur|broken\s+(bone|arm|leg|wrist)", Department::Orthopedics, Severity::Medium),
    ("sprain", r"sprain|twisted\s+(ankle|knee)", Department::Orthopedics, Severity::Low),
    ("fever", r"fever|high\s+temperature", Department::GeneralMedicine, Severity::Low),
    ("vomiting", r"vomit|nausea", Department::GeneralMedicine, Severity::Low),
    ("infant", r"infant|newborn|baby|toddler", Department::Pediatrics, Severity::Medium),
];

/// Regex keyword matcher. The most severe match decides the department;
/// ties go to the rule listed first.
pub struct KeywordSymptomChecker {
    rules: Vec<KeywordRule>,
}

impl KeywordSymptomChecker {
    pub fn new() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(keyword, pattern, department, severity)| {
                Regex::new(&format!("(?i){}", pattern))
                    .ok()
                    .map(|pattern| KeywordRule {
                        keyword: *keyword,
                        pattern,
                        department: *department,
                        severity: *severity,
                    })
            })
            .collect();

        Self { rules }
    }
}

impl Default for KeywordSymptomChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SymptomChecker for KeywordSymptomChecker {
    #[instrument(skip(self, report))]
    async fn assess(&self, report: &SymptomReport) -> Result<TriageSuggestion, TriageError> {
        let text = report.symptoms.trim();
        if text.is_empty() {
            return Err(TriageError::EmptySymptoms);
        }

        let matched: Vec<&KeywordRule> = self
            .rules
            .iter()
            .filter(|rule| rule.pattern.is_match(text))
            .collect();

        let mut best: Option<&KeywordRule> = None;
        for rule in matched.iter().copied() {
            if best.map_or(true, |b| rule.severity > b.severity) {
                best = Some(rule);
            }
        }

        let (department, severity) = best
            .map(|rule| (rule.department, rule.severity))
            .unwrap_or((Department::GeneralMedicine, Severity::Low));
        let severity = adjust_for_age(severity, report.age);

        debug!(
            "Symptom assessment: {} match(es), {} / {}",
            matched.len(),
            department,
            severity
        );

        Ok(TriageSuggestion {
            department,
            severity,
            matched_keywords: matched.iter().map(|rule| rule.keyword.to_string()).collect(),
            advice: advice_for(severity).to_string(),
        })
    }
}

// Very young and very old patients move up one level.
fn adjust_for_age(severity: Severity, age: Option<u32>) -> Severity {
    match age {
        Some(age) if age <= 2 || age >= 75 => match severity {
            Severity::Low => Severity::Medium,
            Severity::Medium => Severity::High,
            Severity::High | Severity::Critical => Severity::Critical,
        },
        _ => severity,
    }
}

fn advice_for(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Submit as critical and alert the on-call team immediately",
        Severity::High => "Submit now; the patient should be seen within 15 minutes",
        Severity::Medium => "Submit the case; expect a doctor within the hour",
        Severity::Low => "Submit the case; routine review",
    }
}
