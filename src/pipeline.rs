//! Pipeline orchestration
//!
//! Public entry points that take a daily record from JSON to an encoded
//! report. Each evaluation runs the same stages:
//! 1. Record parsing and validation
//! 2. Goal resolution, metric derivation and state classification
//! 3. Recovery index against the patient's targets
//! 4. Trend against prior scores
//! 5. Alert assessment and report encoding

use tracing::{debug, info, warn};

use crate::alerts::assess_alert;
use crate::classifier::classify;
use crate::config::EngineConfig;
use crate::encoder::ReportEncoder;
use crate::error::EngineError;
use crate::goals::RecoveryTargets;
use crate::history::ScoreHistory;
use crate::index::{calculate_recovery_index, calculate_trend, day_over_day};
use crate::record::{DailyRecord, RecordAdapter};
use crate::types::{ActivityState, DayEvaluation, RecoveryReport};

/// Evaluate one daily record against targets and the scores of earlier days.
///
/// `previous_scores` is ordered oldest first and must not include the day
/// being evaluated.
pub fn evaluate_record(
    record: &DailyRecord,
    targets: &RecoveryTargets,
    previous_scores: &[u32],
) -> Result<DayEvaluation, EngineError> {
    if let Err(e) = record.validate() {
        warn!(date = %record.date, error = %e, "rejected daily record");
        return Err(e.into());
    }

    let inputs = record.to_activity_inputs(targets.step_target);
    let classification = classify(&inputs);
    let state = classification.state;

    let index = calculate_recovery_index(
        record.protein,
        targets.protein_target_g,
        record.steps.unwrap_or(0.0),
        targets.step_target,
        state,
    );

    let trend = calculate_trend(index.score, previous_scores);
    let day_over_day = day_over_day(index.score, previous_scores.last().copied());
    let alert = assess_alert(state, &index);

    if state == ActivityState::DataSparse {
        info!(date = %record.date, "no activity data logged");
    }
    debug!(
        date = %record.date,
        state = %state,
        score = index.score,
        risk = %index.risk_level,
        "evaluated day"
    );

    Ok(DayEvaluation {
        date: record.date,
        patient_id: record.patient_id.clone(),
        post_op_week: record.post_op_week,
        classification,
        index,
        trend,
        day_over_day,
        alert,
    })
}

/// Evaluate a single daily record JSON object without history.
///
/// # Example
/// ```ignore
/// let targets = RecoveryTargets::new(90.0, 1800.0, 2000.0)?;
/// let report_json = evaluate_day(record_json, &targets)?;
/// ```
pub fn evaluate_day(record_json: String, targets: &RecoveryTargets) -> Result<String, EngineError> {
    let record = RecordAdapter::parse_record(&record_json)?;
    let evaluation = evaluate_record(&record, targets, &[])?;
    ReportEncoder::new().encode_to_json(&evaluation)
}

/// Evaluate a JSON array of daily records as one patient's series.
///
/// Records are ordered by date and each day's trend uses the days before it.
pub fn evaluate_series(
    records_json: String,
    targets: &RecoveryTargets,
) -> Result<Vec<String>, EngineError> {
    let records = RecordAdapter::parse_array(&records_json)?;
    let mut processor = RecoveryProcessor::new(*targets);
    processor.process_records(records)
}

/// Stateful processor that keeps a patient's score history across calls.
///
/// One processor per patient.
pub struct RecoveryProcessor {
    config: EngineConfig,
    targets: RecoveryTargets,
    history: ScoreHistory,
    encoder: ReportEncoder,
}

impl RecoveryProcessor {
    /// Create a processor with default configuration
    pub fn new(targets: RecoveryTargets) -> Self {
        let config = EngineConfig::default();
        Self {
            history: ScoreHistory::new(config.history_window_days),
            config,
            targets,
            encoder: ReportEncoder::new(),
        }
    }

    /// Create a processor with a validated configuration
    pub fn with_config(config: EngineConfig, targets: RecoveryTargets) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            history: ScoreHistory::new(config.history_window_days),
            config,
            targets,
            encoder: ReportEncoder::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn targets(&self) -> &RecoveryTargets {
        &self.targets
    }

    /// Replace targets, e.g. after a weight update
    pub fn set_targets(&mut self, targets: RecoveryTargets) {
        self.targets = targets;
    }

    /// Evaluate one record and add its score to the history
    pub fn process_record(&mut self, record: &DailyRecord) -> Result<RecoveryReport, EngineError> {
        let previous = self.history.previous_scores(record.date);
        let evaluation = evaluate_record(record, &self.targets, &previous)?;
        self.history.record(evaluation.date, evaluation.index.score);
        Ok(self.encoder.encode(&evaluation))
    }

    /// Process a JSON object or array of records, returning one report JSON per day
    pub fn process_json(&mut self, json: &str) -> Result<Vec<String>, EngineError> {
        let records = if json.trim_start().starts_with('[') {
            RecordAdapter::parse_array(json)?
        } else {
            vec![RecordAdapter::parse_record(json)?]
        };
        self.process_records(records)
    }

    fn process_records(&mut self, records: Vec<DailyRecord>) -> Result<Vec<String>, EngineError> {
        let records = RecordAdapter::into_series(records)?;
        info!(days = records.len(), "processing daily records");

        let mut reports = Vec::with_capacity(records.len());
        for record in &records {
            let report = self.process_record(record)?;
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| EngineError::EncodingError(e.to_string()))?;
            reports.push(json);
        }
        Ok(reports)
    }

    /// Save score history to JSON
    pub fn save_history(&self) -> Result<String, EngineError> {
        self.history
            .to_json()
            .map_err(|e| EngineError::EncodingError(e.to_string()))
    }

    /// Load score history from JSON.
    ///
    /// The loaded entries are refit to the configured window; the persisted
    /// window size is not adopted.
    pub fn load_history(&mut self, json: &str) -> Result<(), EngineError> {
        self.history = ScoreHistory::from_json(json)
            .map_err(|e| EngineError::ParseError(e.to_string()))?
            .with_window(self.config.history_window_days);
        debug!(days = self.history.len(), "loaded score history");
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }
}
