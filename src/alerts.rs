//! Alert assessment
//!
//! Decides whether a day's evaluation is notable for the clinician. A day is
//! notable when the index lands in the high-risk tier, or when the activity
//! state is DATA_SPARSE or OVERREACHED regardless of score.

use serde::{Deserialize, Serialize};

use crate::types::{ActivityState, RecoveryIndexResult, RiskLevel};

/// Why a day was flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    HighRisk,
    DataSparse,
    Overreached,
}

impl AlertReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertReason::HighRisk => "high_risk",
            AlertReason::DataSparse => "data_sparse",
            AlertReason::Overreached => "overreached",
        }
    }
}

/// Outcome of alert assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertAssessment {
    pub notable: bool,
    pub reasons: Vec<AlertReason>,
}

/// Assess whether an evaluation should surface to the clinician
pub fn assess_alert(state: ActivityState, result: &RecoveryIndexResult) -> AlertAssessment {
    let mut reasons = Vec::new();

    if result.risk_level == RiskLevel::High {
        reasons.push(AlertReason::HighRisk);
    }

    match state {
        ActivityState::DataSparse => reasons.push(AlertReason::DataSparse),
        ActivityState::Overreached => reasons.push(AlertReason::Overreached),
        _ => {}
    }

    AlertAssessment {
        notable: !reasons.is_empty(),
        reasons,
    }
}
