//! Core types for the recovery engine
//!
//! This module defines the data structures that flow through each stage of an
//! evaluation: raw activity inputs, week-derived goals, derived metrics, the
//! inferred activity state, the recovery index, and the encoded report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::alerts::AlertAssessment;

/// Per-day, per-patient activity snapshot.
///
/// Every field is optional. An absent value is not the same as zero: zero
/// steps is a real observation, a missing step count is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityInputs {
    /// Steps taken today
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_count: Option<f64>,
    /// Daily step target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_target: Option<f64>,
    /// Minutes of deliberate activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_minutes: Option<f64>,
    /// Number of times the patient got up and moved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_moments: Option<f64>,
    /// Longest uninterrupted sitting period (minutes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_sitting_streak_min: Option<f64>,
    /// Sit-to-stand repetitions (carried, not used by the classifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sit_to_stand_count: Option<f64>,
    /// Perceived exertion, 0-10 (carried, not used by the classifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceived_exertion_rpe: Option<f64>,
    /// Fatigue, 0-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatigue: Option<f64>,
    /// Pain, 0-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pain: Option<f64>,
    /// Hours slept last night
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    /// Weeks since surgery (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_op_week: Option<u32>,
}

/// Week-adjusted activity goals (graduated recovery protocol)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityGoals {
    /// Target number of movement moments per day
    pub goal_moments_per_day: f64,
    /// Sitting streak (minutes) at or above which sedentary risk is flagged
    pub max_sitting_streak_min: f64,
    /// Suggested length of a single micro walk (minutes)
    pub micro_walk_min: f64,
    /// Target active minutes per day
    pub active_minutes_target: f64,
}

/// Metrics derived from inputs and goals for one evaluation.
///
/// Ratios are not capped at 1; values above 1 signal overreach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// steps / target, 0 when either is missing
    pub steps_ratio: f64,
    /// movement moments / daily goal
    pub moment_frequency_score: f64,
    /// Longest sitting streak reached the maximum
    pub sedentary_risk: bool,
    /// Highest of the steps, active-minutes and moments ratios
    pub load_indicator: f64,
    /// 1 minus averaged fatigue, pain and sleep penalties (unclamped)
    pub tolerance_indicator: f64,
}

/// Discrete activity state inferred for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityState {
    Adequate,
    Understimulated,
    Stalling,
    FatigueLimited,
    Overreached,
    DataSparse,
}

impl ActivityState {
    /// Every state, in declaration order
    pub const ALL: [ActivityState; 6] = [
        ActivityState::Adequate,
        ActivityState::Understimulated,
        ActivityState::Stalling,
        ActivityState::FatigueLimited,
        ActivityState::Overreached,
        ActivityState::DataSparse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityState::Adequate => "ADEQUATE",
            ActivityState::Understimulated => "UNDERSTIMULATED",
            ActivityState::Stalling => "STALLING",
            ActivityState::FatigueLimited => "FATIGUE_LIMITED",
            ActivityState::Overreached => "OVERREACHED",
            ActivityState::DataSparse => "DATA_SPARSE",
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the classifier, with the intermediate values it used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub state: ActivityState,
    pub goals: ActivityGoals,
    pub metrics: DerivedMetrics,
}

/// Risk tier derived from the recovery index score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the score relative to earlier days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    Unknown,
}

/// Unified 0-100 recovery index with its components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryIndexResult {
    /// protein_score + activity_score + adl_score
    pub score: u32,
    /// Protein adherence, 0-33
    pub protein_score: u32,
    /// Step goal adherence, 0-33
    pub activity_score: u32,
    /// Daily-living capability from the activity state, 0-34
    pub adl_score: u32,
    pub risk_level: RiskLevel,
}

/// Everything computed for one patient-day, ready for encoding
#[derive(Debug, Clone, PartialEq)]
pub struct DayEvaluation {
    pub date: NaiveDate,
    pub patient_id: Option<String>,
    pub post_op_week: Option<u32>,
    pub classification: Classification,
    pub index: RecoveryIndexResult,
    pub trend: Trend,
    pub day_over_day: Option<Trend>,
    pub alert: AlertAssessment,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Activity section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportActivity {
    pub state: ActivityState,
    pub label: String,
    pub color: String,
    pub gauge_position: u8,
    pub response: String,
    pub actions: Vec<String>,
    pub goals: ActivityGoals,
    pub metrics: DerivedMetrics,
}

/// Recovery index section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportIndex {
    pub score: u32,
    pub protein_score: u32,
    pub activity_score: u32,
    pub adl_score: u32,
    pub risk_level: RiskLevel,
    pub risk_label: String,
    pub score_band: String,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_over_day: Option<Trend>,
}

/// Alert section of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportAlert {
    pub notable: bool,
    pub reasons: Vec<String>,
}

/// Complete daily recovery report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryReport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_op_week: Option<u32>,
    pub activity: ReportActivity,
    pub recovery_index: ReportIndex,
    pub alert: ReportAlert,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_names() {
        for state in ActivityState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn test_inputs_absent_fields_deserialize_as_none() {
        let inputs: ActivityInputs =
            serde_json::from_str(r#"{"steps_count": 0, "post_op_week": 2}"#).unwrap();
        assert_eq!(inputs.steps_count, Some(0.0));
        assert_eq!(inputs.post_op_week, Some(2));
        assert!(inputs.active_minutes.is_none());
        assert!(inputs.movement_moments.is_none());
    }

    #[test]
    fn test_inputs_skip_absent_on_serialize() {
        let inputs = ActivityInputs {
            fatigue: Some(3.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&inputs).unwrap();
        assert_eq!(json, r#"{"fatigue":3.0}"#);
    }

    #[test]
    fn test_risk_and_trend_wire_names() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"medium\"");
        assert_eq!(serde_json::to_string(&Trend::Declining).unwrap(), "\"declining\"");
    }
}
