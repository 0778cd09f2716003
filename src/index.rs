//! Recovery index (herstelindex)
//!
//! A unified 0-100 score built from three components:
//! - Protein adherence (0-33)
//! - Step goal adherence (0-33)
//! - Daily-living capability from the activity state (0-34)
//!
//! The ADL component is a literal lookup table. The values encode clinical
//! weighting, not a formula, and must not be derived from the state ordinal.

use crate::types::{ActivityState, RecoveryIndexResult, RiskLevel, Trend};

/// Maximum protein component
pub const MAX_PROTEIN_SCORE: u32 = 33;

/// Maximum activity component
pub const MAX_ACTIVITY_SCORE: u32 = 33;

/// Maximum ADL component
pub const MAX_ADL_SCORE: u32 = 34;

/// Lowest score in the low-risk tier
pub const LOW_RISK_MIN_SCORE: u32 = 70;

/// Lowest score in the medium-risk tier
pub const MEDIUM_RISK_MIN_SCORE: u32 = 50;

/// Number of prior scores averaged for the trend
pub const TREND_WINDOW: usize = 3;

/// Minimum prior scores before a trend is reported
pub const TREND_MIN_HISTORY: usize = 2;

/// Score change against the trend average that counts as movement
pub const TREND_THRESHOLD: f64 = 10.0;

/// Score change against the previous day that counts as movement
pub const DAY_OVER_DAY_THRESHOLD: i64 = 5;

/// ADL score for each activity state
pub fn adl_score(state: ActivityState) -> u32 {
    match state {
        ActivityState::Adequate => 34,
        ActivityState::Understimulated => 20,
        ActivityState::Stalling => 14,
        ActivityState::FatigueLimited => 17,
        ActivityState::Overreached => 10,
        ActivityState::DataSparse => 0,
    }
}

/// Calculate the recovery index for one day.
///
/// Non-positive targets yield a zero component rather than an error.
pub fn calculate_recovery_index(
    daily_protein: f64,
    protein_target: f64,
    daily_steps: f64,
    step_target: f64,
    activity_state: ActivityState,
) -> RecoveryIndexResult {
    let protein_score = component_score(daily_protein, protein_target, MAX_PROTEIN_SCORE);
    let activity_score = component_score(daily_steps, step_target, MAX_ACTIVITY_SCORE);
    let adl_score = adl_score(activity_state).min(MAX_ADL_SCORE);

    let score = protein_score + activity_score + adl_score;

    RecoveryIndexResult {
        score,
        protein_score,
        activity_score,
        adl_score,
        risk_level: risk_level(score),
    }
}

/// Risk tier for a score; lower bounds are inclusive
pub fn risk_level(score: u32) -> RiskLevel {
    if score >= LOW_RISK_MIN_SCORE {
        RiskLevel::Low
    } else if score >= MEDIUM_RISK_MIN_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Compare today's score to the mean of the last three prior scores.
///
/// `previous_scores` is ordered oldest first. Fewer than two prior scores
/// gives [`Trend::Unknown`].
pub fn calculate_trend(current_score: u32, previous_scores: &[u32]) -> Trend {
    if previous_scores.len() < TREND_MIN_HISTORY {
        return Trend::Unknown;
    }

    let recent = &previous_scores[previous_scores.len().saturating_sub(TREND_WINDOW)..];
    let average = recent.iter().map(|&s| f64::from(s)).sum::<f64>() / recent.len() as f64;
    let diff = f64::from(current_score) - average;

    if diff >= TREND_THRESHOLD {
        Trend::Improving
    } else if diff <= -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Short-horizon change against a single previous score (+/-5 band)
pub fn day_over_day(current_score: u32, previous_score: Option<u32>) -> Option<Trend> {
    let previous = previous_score?;
    let diff = i64::from(current_score) - i64::from(previous);
    Some(if diff >= DAY_OVER_DAY_THRESHOLD {
        Trend::Improving
    } else if diff <= -DAY_OVER_DAY_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    })
}

/// round(min(actual / target, 1) * max), with the ratio floored at 0
fn component_score(actual: f64, target: f64, max: u32) -> u32 {
    let ratio = if target > 0.0 && target.is_finite() {
        actual / target
    } else {
        0.0
    };
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    // ratio is within [0, 1], so the product fits in u32
    ((ratio * f64::from(max)).round() as u32).min(max)
}
