//! Parsing daily records from JSON and NDJSON input

use crate::error::EngineError;
use crate::record::daily::{DailyRecord, ValidationError};
use chrono::NaiveDate;
use tracing::warn;

/// Adapter for reading daily records from serialized input
pub struct RecordAdapter;

impl RecordAdapter {
    /// Parse a single JSON object into a record
    pub fn parse_record(json: &str) -> Result<DailyRecord, EngineError> {
        let record: DailyRecord = serde_json::from_str(json)?;
        Ok(record)
    }

    /// Parse a JSON array of records
    pub fn parse_array(json: &str) -> Result<Vec<DailyRecord>, EngineError> {
        let records: Vec<DailyRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (one record per line, blank lines skipped)
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<DailyRecord>, EngineError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<DailyRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(EngineError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Validate a batch, returning only the failures
    pub fn validate_records(records: &[DailyRecord]) -> Vec<RecordValidationResult> {
        records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                record.validate().err().map(|error| RecordValidationResult {
                    index,
                    date: record.date,
                    error,
                })
            })
            .collect()
    }

    /// Validate every record and order them by date for sequential scoring
    pub fn into_series(mut records: Vec<DailyRecord>) -> Result<Vec<DailyRecord>, EngineError> {
        if let Some(failure) = Self::validate_records(&records).into_iter().next() {
            warn!(
                index = failure.index,
                date = %failure.date,
                error = %failure.error,
                "rejected daily record in series"
            );
            return Err(EngineError::InvalidRecord(failure.error));
        }
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

/// A record that failed validation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValidationResult {
    pub index: usize,
    pub date: NaiveDate,
    pub error: ValidationError,
}
