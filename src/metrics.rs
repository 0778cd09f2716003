//! Derived metric computation
//!
//! This module turns raw activity inputs and week goals into the ratios the
//! classifier reasons about:
//! - Steps and movement-moment adherence
//! - Sedentary risk from the longest sitting streak
//! - Load (highest adherence ratio, uncapped)
//! - Tolerance from fatigue, pain and sleep

use crate::types::{ActivityGoals, ActivityInputs, DerivedMetrics};

/// Sleep below this many hours counts as short sleep
pub const SHORT_SLEEP_HOURS: f64 = 6.0;

/// Tolerance penalty applied for short sleep
const SHORT_SLEEP_PENALTY: f64 = 0.3;

/// Compute derived metrics for one day's inputs
pub fn compute_metrics(inputs: &ActivityInputs, goals: &ActivityGoals) -> DerivedMetrics {
    let steps_ratio = compute_steps_ratio(inputs.steps_count, inputs.steps_target);
    let moment_frequency_score = ratio(inputs.movement_moments, goals.goal_moments_per_day);
    let sedentary_risk = compute_sedentary_risk(
        inputs.longest_sitting_streak_min,
        goals.max_sitting_streak_min,
    );
    let active_minutes_ratio = ratio(inputs.active_minutes, goals.active_minutes_target);
    let load_indicator = steps_ratio
        .max(active_minutes_ratio)
        .max(moment_frequency_score);
    let tolerance_indicator = compute_tolerance(inputs);

    DerivedMetrics {
        steps_ratio,
        moment_frequency_score,
        sedentary_risk,
        load_indicator,
        tolerance_indicator,
    }
}

/// steps / target when both are present and the target is positive
fn compute_steps_ratio(steps: Option<f64>, target: Option<f64>) -> f64 {
    match target {
        Some(target) => ratio(steps, target),
        None => 0.0,
    }
}

/// numerator / denominator, or 0 for a missing numerator or unusable denominator
fn ratio(numerator: Option<f64>, denominator: f64) -> f64 {
    match numerator {
        Some(value) if denominator > 0.0 => {
            let r = value / denominator;
            if r.is_finite() {
                r
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn compute_sedentary_risk(longest_streak_min: Option<f64>, max_streak_min: f64) -> bool {
    longest_streak_min.unwrap_or(0.0) >= max_streak_min
}

/// Tolerance indicator: `1 - (fatigue/10 + pain/10 + sleep_penalty) / 3`
///
/// Not clamped; very high combined fatigue and pain can push it below zero.
fn compute_tolerance(inputs: &ActivityInputs) -> f64 {
    let fatigue_penalty = inputs.fatigue.unwrap_or(0.0) / 10.0;
    let pain_penalty = inputs.pain.unwrap_or(0.0) / 10.0;
    let sleep_penalty = match inputs.sleep_hours {
        Some(hours) if hours < SHORT_SLEEP_HOURS => SHORT_SLEEP_PENALTY,
        _ => 0.0,
    };
    1.0 - (fatigue_penalty + pain_penalty + sleep_penalty) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::resolve_goals;

    fn week1() -> ActivityGoals {
        resolve_goals(Some(1))
    }

    #[test]
    fn test_steps_ratio_requires_both_values() {
        let goals = week1();

        let only_steps = ActivityInputs {
            steps_count: Some(1500.0),
            ..Default::default()
        };
        assert_eq!(compute_metrics(&only_steps, &goals).steps_ratio, 0.0);

        let zero_target = ActivityInputs {
            steps_count: Some(1500.0),
            steps_target: Some(0.0),
            ..Default::default()
        };
        assert_eq!(compute_metrics(&zero_target, &goals).steps_ratio, 0.0);

        let both = ActivityInputs {
            steps_count: Some(1500.0),
            steps_target: Some(2000.0),
            ..Default::default()
        };
        assert!((compute_metrics(&both, &goals).steps_ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_moment_frequency_uses_week_goal() {
        let inputs = ActivityInputs {
            movement_moments: Some(8.0),
            post_op_week: Some(1),
            ..Default::default()
        };
        let metrics = compute_metrics(&inputs, &week1());
        assert!((metrics.moment_frequency_score - 8.0 / 6.0).abs() < 1e-9);

        let metrics = compute_metrics(&inputs, &resolve_goals(Some(3)));
        assert!((metrics.moment_frequency_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sedentary_risk_threshold_inclusive() {
        let goals = week1();
        let at_limit = ActivityInputs {
            longest_sitting_streak_min: Some(90.0),
            ..Default::default()
        };
        assert!(compute_metrics(&at_limit, &goals).sedentary_risk);

        let below = ActivityInputs {
            longest_sitting_streak_min: Some(89.0),
            ..Default::default()
        };
        assert!(!compute_metrics(&below, &goals).sedentary_risk);

        assert!(!compute_metrics(&ActivityInputs::default(), &goals).sedentary_risk);
    }

    #[test]
    fn test_load_indicator_is_uncapped_max() {
        let inputs = ActivityInputs {
            steps_count: Some(1000.0),
            steps_target: Some(2000.0),
            active_minutes: Some(30.0),
            movement_moments: Some(3.0),
            ..Default::default()
        };
        // active minutes: 30 / 15 = 2.0
        let metrics = compute_metrics(&inputs, &week1());
        assert!((metrics.load_indicator - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_penalties() {
        let goals = week1();
        assert_eq!(
            compute_metrics(&ActivityInputs::default(), &goals).tolerance_indicator,
            1.0
        );

        let inputs = ActivityInputs {
            fatigue: Some(6.0),
            pain: Some(3.0),
            sleep_hours: Some(5.0),
            ..Default::default()
        };
        // 1 - (0.6 + 0.3 + 0.3) / 3 = 0.6
        let metrics = compute_metrics(&inputs, &goals);
        assert!((metrics.tolerance_indicator - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_zero_sleep_counts_as_short_sleep() {
        let inputs = ActivityInputs {
            sleep_hours: Some(0.0),
            ..Default::default()
        };
        let metrics = compute_metrics(&inputs, &week1());
        assert!((metrics.tolerance_indicator - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_tolerance_is_not_clamped() {
        let inputs = ActivityInputs {
            fatigue: Some(40.0),
            pain: Some(40.0),
            ..Default::default()
        };
        let metrics = compute_metrics(&inputs, &week1());
        assert!(metrics.tolerance_indicator < 0.0);
    }

    #[test]
    fn test_non_finite_ratio_replaced_by_zero() {
        let inputs = ActivityInputs {
            steps_count: Some(f64::INFINITY),
            steps_target: Some(2000.0),
            ..Default::default()
        };
        assert_eq!(compute_metrics(&inputs, &week1()).steps_ratio, 0.0);
    }
}
