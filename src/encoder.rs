//! Report encoding
//!
//! Turns a [`DayEvaluation`] into the serializable [`RecoveryReport`] that
//! dashboards and patient apps consume: the activity state with its guidance,
//! the recovery index with trend, and the alert section.

use crate::error::EngineError;
use crate::guidance::{risk_label, ScoreBand, StateGuidance};
use crate::types::{
    DayEvaluation, RecoveryReport, ReportActivity, ReportAlert, ReportIndex, ReportProducer,
};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Encoder for daily recovery reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode an evaluation into a report
    pub fn encode(&self, evaluation: &DayEvaluation) -> RecoveryReport {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        RecoveryReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            date: evaluation.date.format("%Y-%m-%d").to_string(),
            patient_id: evaluation.patient_id.clone(),
            post_op_week: evaluation.post_op_week,
            activity: self.build_activity(evaluation),
            recovery_index: self.build_index(evaluation),
            alert: ReportAlert {
                notable: evaluation.alert.notable,
                reasons: evaluation
                    .alert
                    .reasons
                    .iter()
                    .map(|r| r.as_str().to_string())
                    .collect(),
            },
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(&self, evaluation: &DayEvaluation) -> Result<String, EngineError> {
        let report = self.encode(evaluation);
        serde_json::to_string_pretty(&report)
            .map_err(|e| EngineError::EncodingError(e.to_string()))
    }

    fn build_activity(&self, evaluation: &DayEvaluation) -> ReportActivity {
        let classification = &evaluation.classification;
        let guidance = StateGuidance::for_state(classification.state);

        ReportActivity {
            state: classification.state,
            label: guidance.label.to_string(),
            color: guidance.color.as_str().to_string(),
            gauge_position: guidance.gauge_position,
            response: guidance.response.to_string(),
            actions: guidance.action_codes(),
            goals: classification.goals,
            metrics: classification.metrics,
        }
    }

    fn build_index(&self, evaluation: &DayEvaluation) -> ReportIndex {
        let index = &evaluation.index;

        ReportIndex {
            score: index.score,
            protein_score: index.protein_score,
            activity_score: index.activity_score,
            adl_score: index.adl_score,
            risk_level: index.risk_level,
            risk_label: risk_label(index.risk_level).to_string(),
            score_band: ScoreBand::for_score(index.score).as_str().to_string(),
            trend: evaluation.trend,
            day_over_day: evaluation.day_over_day,
        }
    }
}
