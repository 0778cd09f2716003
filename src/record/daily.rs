//! Daily aggregate record
//!
//! The persisted per-day shape a caller assembles before evaluation: summed
//! nutrition and activity logs plus the optional patient check-in. Absent
//! values stay absent all the way into [`ActivityInputs`] so that a day with
//! nothing logged can be recognised as data-sparse.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ActivityInputs;

/// Upper bound for 0-10 self-reported scales
pub const SCALE_MAX: f64 = 10.0;

/// Upper bound for sleep hours in a day
pub const SLEEP_HOURS_MAX: f64 = 24.0;

/// Optional check-in answers for a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckIn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movement_moments: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_sitting_streak_min: Option<f64>,
    #[serde(alias = "fatigue", skip_serializing_if = "Option::is_none")]
    pub fatigue_score: Option<f64>,
    #[serde(alias = "pain", skip_serializing_if = "Option::is_none")]
    pub pain_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sit_to_stand_count: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perceived_exertion_rpe: Option<f64>,
}

/// One logged meal or snack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodLog {
    /// Estimated protein (grams)
    #[serde(default)]
    pub estimated_protein: Option<f64>,
    /// Estimated energy (kcal)
    #[serde(default)]
    pub estimated_calories: Option<f64>,
}

/// One logged activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(default)]
    pub step_count: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<f64>,
}

/// Daily aggregate for one patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar day this record covers
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_op_week: Option<u32>,
    /// Protein eaten (grams)
    #[serde(default)]
    pub protein: f64,
    /// Energy eaten (kcal)
    #[serde(default)]
    pub calories: f64,
    #[serde(default, alias = "steps_count", skip_serializing_if = "Option::is_none")]
    pub steps: Option<f64>,
    #[serde(default, alias = "active_minutes", skip_serializing_if = "Option::is_none")]
    pub activity_minutes: Option<f64>,
    #[serde(flatten)]
    pub check_in: CheckIn,
}

impl DailyRecord {
    /// Create an empty record for a day: nothing eaten, nothing logged
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            patient_id: None,
            post_op_week: None,
            protein: 0.0,
            calories: 0.0,
            steps: None,
            activity_minutes: None,
            check_in: CheckIn::default(),
        }
    }

    /// Assemble a record by summing the day's logs.
    ///
    /// Steps and activity minutes are only present when at least one log
    /// carried a value; protein and calories treat missing estimates as 0.
    pub fn from_logs(
        date: NaiveDate,
        food_logs: &[FoodLog],
        activity_logs: &[ActivityLog],
        check_in: CheckIn,
    ) -> Self {
        Self {
            protein: sum_present(food_logs.iter().map(|l| l.estimated_protein)).unwrap_or(0.0),
            calories: sum_present(food_logs.iter().map(|l| l.estimated_calories)).unwrap_or(0.0),
            steps: sum_present(activity_logs.iter().map(|l| l.step_count)),
            activity_minutes: sum_present(activity_logs.iter().map(|l| l.duration_minutes)),
            check_in,
            ..Self::new(date)
        }
    }

    /// Attach a patient identifier
    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Attach the post-operative week
    pub fn with_post_op_week(mut self, week: u32) -> Self {
        self.post_op_week = Some(week);
        self
    }

    /// Map onto classifier inputs using the patient's step target
    pub fn to_activity_inputs(&self, step_target: f64) -> ActivityInputs {
        ActivityInputs {
            steps_count: self.steps,
            steps_target: Some(step_target),
            active_minutes: self.activity_minutes,
            movement_moments: self.check_in.movement_moments,
            longest_sitting_streak_min: self.check_in.longest_sitting_streak_min,
            sit_to_stand_count: self.check_in.sit_to_stand_count,
            perceived_exertion_rpe: self.check_in.perceived_exertion_rpe,
            fatigue: self.check_in.fatigue_score,
            pain: self.check_in.pain_score,
            sleep_hours: self.check_in.sleep_hours,
            post_op_week: self.post_op_week,
        }
    }

    /// Validate value ranges before the record reaches the engine
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.post_op_week == Some(0) {
            return Err(ValidationError::InvalidWeek);
        }

        non_negative("protein", Some(self.protein))?;
        non_negative("calories", Some(self.calories))?;
        non_negative("steps", self.steps)?;
        non_negative("activity_minutes", self.activity_minutes)?;

        let check_in = &self.check_in;
        non_negative("movement_moments", check_in.movement_moments)?;
        non_negative("longest_sitting_streak_min", check_in.longest_sitting_streak_min)?;
        non_negative("sit_to_stand_count", check_in.sit_to_stand_count)?;
        within("fatigue_score", check_in.fatigue_score, SCALE_MAX)?;
        within("pain_score", check_in.pain_score, SCALE_MAX)?;
        within("perceived_exertion_rpe", check_in.perceived_exertion_rpe, SCALE_MAX)?;
        within("sleep_hours", check_in.sleep_hours, SLEEP_HOURS_MAX)?;

        Ok(())
    }
}

fn sum_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    values.flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

fn non_negative(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_finite() => Err(ValidationError::NotFinite { field }),
        Some(v) if v < 0.0 => Err(ValidationError::Negative { field, value: v }),
        _ => Ok(()),
    }
}

fn within(field: &'static str, value: Option<f64>, max: f64) -> Result<(), ValidationError> {
    non_negative(field, value)?;
    match value {
        Some(v) if v > max => Err(ValidationError::OutOfRange {
            field,
            value: v,
            min: 0.0,
            max,
        }),
        _ => Ok(()),
    }
}

/// Validation errors for daily records
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("post_op_week starts at 1")]
    InvalidWeek,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_from_logs_sums_and_preserves_absence() {
        let food = vec![
            FoodLog {
                estimated_protein: Some(25.0),
                estimated_calories: Some(400.0),
            },
            FoodLog {
                estimated_protein: None,
                estimated_calories: Some(150.0),
            },
            FoodLog {
                estimated_protein: Some(30.5),
                estimated_calories: None,
            },
        ];
        let activity = vec![
            ActivityLog {
                step_count: None,
                duration_minutes: Some(10.0),
            },
            ActivityLog {
                step_count: None,
                duration_minutes: Some(5.0),
            },
        ];

        let record = DailyRecord::from_logs(day(), &food, &activity, CheckIn::default());
        assert_eq!(record.protein, 55.5);
        assert_eq!(record.calories, 550.0);
        assert_eq!(record.steps, None);
        assert_eq!(record.activity_minutes, Some(15.0));
    }

    #[test]
    fn test_no_logs_is_data_sparse_shape() {
        let record = DailyRecord::from_logs(day(), &[], &[], CheckIn::default());
        assert_eq!(record, DailyRecord::new(day()));

        let inputs = record.to_activity_inputs(2000.0);
        assert!(inputs.steps_count.is_none());
        assert!(inputs.active_minutes.is_none());
        assert!(inputs.movement_moments.is_none());
    }

    #[test]
    fn test_zero_step_log_is_present() {
        let activity = vec![ActivityLog {
            step_count: Some(0.0),
            duration_minutes: None,
        }];
        let record = DailyRecord::from_logs(day(), &[], &activity, CheckIn::default());
        assert_eq!(record.steps, Some(0.0));
    }

    #[test]
    fn test_to_activity_inputs_maps_check_in() {
        let record = DailyRecord {
            steps: Some(1200.0),
            check_in: CheckIn {
                movement_moments: Some(5.0),
                fatigue_score: Some(4.0),
                pain_score: Some(2.0),
                sleep_hours: Some(7.5),
                ..Default::default()
            },
            ..DailyRecord::new(day())
        }
        .with_post_op_week(2);

        let inputs = record.to_activity_inputs(2500.0);
        assert_eq!(
            inputs,
            ActivityInputs {
                steps_count: Some(1200.0),
                steps_target: Some(2500.0),
                movement_moments: Some(5.0),
                fatigue: Some(4.0),
                pain: Some(2.0),
                sleep_hours: Some(7.5),
                post_op_week: Some(2),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_deserialize_persisted_shape() {
        let json = r#"{
            "date": "2024-03-04",
            "protein": 72,
            "calories": 1650,
            "steps": 1800,
            "activity_minutes": 20,
            "movement_moments": 7,
            "longest_sitting_streak_min": 60,
            "fatigue_score": 3,
            "pain_score": 2,
            "sleep_hours": 7
        }"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, day());
        assert_eq!(record.steps, Some(1800.0));
        assert_eq!(record.check_in.movement_moments, Some(7.0));
        assert_eq!(record.check_in.fatigue_score, Some(3.0));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{"date": "2024-03-04", "steps_count": 900, "fatigue": 8}"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.steps, Some(900.0));
        assert_eq!(record.check_in.fatigue_score, Some(8.0));
        assert_eq!(record.protein, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let week_zero = DailyRecord::new(day()).with_post_op_week(0);
        assert_eq!(week_zero.validate(), Err(ValidationError::InvalidWeek));

        let negative_steps = DailyRecord {
            steps: Some(-5.0),
            ..DailyRecord::new(day())
        };
        assert_eq!(
            negative_steps.validate(),
            Err(ValidationError::Negative {
                field: "steps",
                value: -5.0
            })
        );

        let high_pain = DailyRecord {
            check_in: CheckIn {
                pain_score: Some(11.0),
                ..Default::default()
            },
            ..DailyRecord::new(day())
        };
        assert!(matches!(
            high_pain.validate(),
            Err(ValidationError::OutOfRange { field: "pain_score", .. })
        ));

        let nan_protein = DailyRecord {
            protein: f64::NAN,
            ..DailyRecord::new(day())
        };
        assert_eq!(
            nan_protein.validate(),
            Err(ValidationError::NotFinite { field: "protein" })
        );
    }

    #[test]
    fn test_validate_accepts_scale_bounds() {
        let record = DailyRecord {
            check_in: CheckIn {
                fatigue_score: Some(10.0),
                pain_score: Some(0.0),
                sleep_hours: Some(24.0),
                ..Default::default()
            },
            ..DailyRecord::new(day())
        };
        assert!(record.validate().is_ok());
    }
}
