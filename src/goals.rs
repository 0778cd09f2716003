//! Goal resolution
//!
//! Activity goals follow a graduated recovery protocol keyed on the
//! post-operative week, plateauing from week 3 onward. Nutrition targets are
//! derived from body weight.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::types::ActivityGoals;

/// Longest acceptable sitting streak in minutes. Same in every week.
pub const MAX_SITTING_STREAK_MIN: f64 = 90.0;

const WEEK_1_GOALS: ActivityGoals = ActivityGoals {
    goal_moments_per_day: 6.0,
    max_sitting_streak_min: MAX_SITTING_STREAK_MIN,
    micro_walk_min: 3.0,
    active_minutes_target: 15.0,
};

const WEEK_2_GOALS: ActivityGoals = ActivityGoals {
    goal_moments_per_day: 7.0,
    max_sitting_streak_min: MAX_SITTING_STREAK_MIN,
    micro_walk_min: 4.0,
    active_minutes_target: 20.0,
};

const PLATEAU_GOALS: ActivityGoals = ActivityGoals {
    goal_moments_per_day: 8.0,
    max_sitting_streak_min: MAX_SITTING_STREAK_MIN,
    micro_walk_min: 5.0,
    active_minutes_target: 25.0,
};

/// Resolve the activity goals for a post-operative week.
///
/// A missing week (or week 0) gets the most conservative week-1 goals.
pub fn resolve_goals(post_op_week: Option<u32>) -> ActivityGoals {
    match post_op_week.unwrap_or(1) {
        0 | 1 => WEEK_1_GOALS,
        2 => WEEK_2_GOALS,
        _ => PLATEAU_GOALS,
    }
}

/// Daily nutrition and step targets for one patient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTargets {
    /// Protein target (grams/day)
    pub protein_target_g: f64,
    /// Energy target (kcal/day)
    pub calorie_target_kcal: f64,
    /// Step target (steps/day)
    pub step_target: f64,
}

impl RecoveryTargets {
    /// Build targets from explicit values, rejecting non-positive denominators
    pub fn new(
        protein_target_g: f64,
        calorie_target_kcal: f64,
        step_target: f64,
    ) -> Result<Self, EngineError> {
        require_positive("protein_target_g", protein_target_g)?;
        require_positive("calorie_target_kcal", calorie_target_kcal)?;
        require_positive("step_target", step_target)?;
        Ok(Self {
            protein_target_g,
            calorie_target_kcal,
            step_target,
        })
    }

    /// Derive targets from body weight using the configured per-kg factors.
    ///
    /// Protein and calorie targets are rounded to whole units.
    pub fn from_weight(weight_kg: f64, config: &EngineConfig) -> Result<Self, EngineError> {
        require_positive("weight_kg", weight_kg)?;
        Self::new(
            (weight_kg * config.protein_g_per_kg).round(),
            (weight_kg * config.calories_kcal_per_kg).round(),
            config.default_step_target,
        )
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidTarget(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_week_is_week_one() {
        assert_eq!(resolve_goals(None), resolve_goals(Some(1)));
        assert_eq!(resolve_goals(Some(0)), resolve_goals(Some(1)));
        assert_eq!(resolve_goals(None).goal_moments_per_day, 6.0);
    }

    #[test]
    fn test_week_tiers() {
        let week2 = resolve_goals(Some(2));
        assert_eq!(week2.goal_moments_per_day, 7.0);
        assert_eq!(week2.micro_walk_min, 4.0);
        assert_eq!(week2.active_minutes_target, 20.0);

        assert_eq!(resolve_goals(Some(3)), resolve_goals(Some(12)));
        assert_eq!(resolve_goals(Some(3)).active_minutes_target, 25.0);
    }

    #[test]
    fn test_goals_non_decreasing_with_constant_sitting_limit() {
        let mut previous = resolve_goals(Some(1));
        for week in 2..=6 {
            let goals = resolve_goals(Some(week));
            assert!(goals.goal_moments_per_day >= previous.goal_moments_per_day);
            assert!(goals.micro_walk_min >= previous.micro_walk_min);
            assert!(goals.active_minutes_target >= previous.active_minutes_target);
            assert_eq!(goals.max_sitting_streak_min, 90.0);
            previous = goals;
        }
    }

    #[test]
    fn test_targets_from_weight() {
        let targets = RecoveryTargets::from_weight(70.0, &EngineConfig::default()).unwrap();
        assert_eq!(
            targets,
            RecoveryTargets {
                protein_target_g: 105.0,
                calorie_target_kcal: 1925.0,
                step_target: 2000.0,
            }
        );
    }

    #[test]
    fn test_targets_round_to_whole_units() {
        let targets = RecoveryTargets::from_weight(63.3, &EngineConfig::default()).unwrap();
        // 94.95 g and 1740.75 kcal
        assert_eq!(targets.protein_target_g, 95.0);
        assert_eq!(targets.calorie_target_kcal, 1741.0);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let config = EngineConfig::default();
        assert!(RecoveryTargets::from_weight(0.0, &config).is_err());
        assert!(RecoveryTargets::from_weight(-70.0, &config).is_err());
        assert!(RecoveryTargets::from_weight(f64::NAN, &config).is_err());
    }

    #[test]
    fn test_explicit_targets_validated() {
        assert!(RecoveryTargets::new(90.0, 1800.0, 2000.0).is_ok());
        assert!(matches!(
            RecoveryTargets::new(90.0, 1800.0, 0.0),
            Err(EngineError::InvalidTarget(_))
        ));
    }
}
