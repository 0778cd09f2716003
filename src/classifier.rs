//! Activity state classification
//!
//! States are decided by an ordered rule ladder. The first rule whose
//! predicate holds wins and nothing after it is consulted, so the order of
//! [`RULES`] is the safety contract: missing data and overreach must
//! short-circuit everything else.
//!
//! | priority | state            | fires when                                                   |
//! |----------|------------------|--------------------------------------------------------------|
//! | 1        | DATA_SPARSE      | steps, active minutes and movement moments are all absent    |
//! | 2        | OVERREACHED      | load >= 1.2 and (sleep < 6h or fatigue >= 7)                  |
//! | 3        | FATIGUE_LIMITED  | (fatigue >= 7 or pain >= 7) and (steps < 80% or moments < goal) |
//! | 4        | STALLING         | sedentary risk and fewer than 4 recorded movement moments    |
//! | 5        | UNDERSTIMULATED  | steps < 60% or moments < 60% of goal                         |
//! | 6        | ADEQUATE         | otherwise                                                    |

use tracing::debug;

use crate::goals::resolve_goals;
use crate::metrics::{compute_metrics, SHORT_SLEEP_HOURS};
use crate::types::{ActivityInputs, ActivityState, Classification, DerivedMetrics};

/// Load at or above which a day counts as overreaching
pub const OVERREACH_LOAD: f64 = 1.2;

/// Fatigue or pain score (0-10) considered high distress
pub const HIGH_DISTRESS_SCORE: f64 = 7.0;

/// Steps ratio below which distress is treated as limiting output
pub const FATIGUE_STEPS_RATIO: f64 = 0.8;

/// Moment frequency below which distress is treated as limiting output
pub const FATIGUE_MOMENT_SCORE: f64 = 1.0;

/// Movement moments below which a sedentary day is stalling
pub const STALLING_MAX_MOMENTS: f64 = 4.0;

/// Adherence ratio below which a day is understimulated
pub const UNDERSTIMULATED_RATIO: f64 = 0.6;

type Predicate = fn(&ActivityInputs, &DerivedMetrics) -> bool;

/// One step of the ladder
pub struct Rule {
    pub state: ActivityState,
    applies: Predicate,
}

impl Rule {
    pub fn applies(&self, inputs: &ActivityInputs, metrics: &DerivedMetrics) -> bool {
        (self.applies)(inputs, metrics)
    }
}

/// The rule ladder, in priority order. ADEQUATE is the fall-through.
pub static RULES: [Rule; 5] = [
    Rule {
        state: ActivityState::DataSparse,
        applies: is_data_sparse,
    },
    Rule {
        state: ActivityState::Overreached,
        applies: is_overreached,
    },
    Rule {
        state: ActivityState::FatigueLimited,
        applies: is_fatigue_limited,
    },
    Rule {
        state: ActivityState::Stalling,
        applies: is_stalling,
    },
    Rule {
        state: ActivityState::Understimulated,
        applies: is_understimulated,
    },
];

/// Infer the activity state for one day's inputs
pub fn infer_state(inputs: &ActivityInputs) -> ActivityState {
    classify(inputs).state
}

/// Infer the activity state and return the goals and metrics used to reach it
pub fn classify(inputs: &ActivityInputs) -> Classification {
    let goals = resolve_goals(inputs.post_op_week);
    let metrics = compute_metrics(inputs, &goals);

    let state = RULES
        .iter()
        .find(|rule| rule.applies(inputs, &metrics))
        .map(|rule| rule.state)
        .unwrap_or(ActivityState::Adequate);

    debug!(
        state = %state,
        steps_ratio = metrics.steps_ratio,
        moment_frequency_score = metrics.moment_frequency_score,
        load_indicator = metrics.load_indicator,
        sedentary_risk = metrics.sedentary_risk,
        "activity state inferred"
    );

    Classification {
        state,
        goals,
        metrics,
    }
}

fn is_data_sparse(inputs: &ActivityInputs, _: &DerivedMetrics) -> bool {
    inputs.steps_count.is_none()
        && inputs.active_minutes.is_none()
        && inputs.movement_moments.is_none()
}

fn is_overreached(inputs: &ActivityInputs, metrics: &DerivedMetrics) -> bool {
    metrics.load_indicator >= OVERREACH_LOAD && (short_sleep(inputs) || high_fatigue(inputs))
}

fn is_fatigue_limited(inputs: &ActivityInputs, metrics: &DerivedMetrics) -> bool {
    let distressed = high_fatigue(inputs) || at_least(inputs.pain, HIGH_DISTRESS_SCORE);
    let reduced_output = metrics.steps_ratio < FATIGUE_STEPS_RATIO
        || metrics.moment_frequency_score < FATIGUE_MOMENT_SCORE;
    distressed && reduced_output
}

fn is_stalling(inputs: &ActivityInputs, metrics: &DerivedMetrics) -> bool {
    metrics.sedentary_risk
        && matches!(inputs.movement_moments, Some(moments) if moments < STALLING_MAX_MOMENTS)
}

fn is_understimulated(_: &ActivityInputs, metrics: &DerivedMetrics) -> bool {
    metrics.steps_ratio < UNDERSTIMULATED_RATIO
        || metrics.moment_frequency_score < UNDERSTIMULATED_RATIO
}

fn short_sleep(inputs: &ActivityInputs) -> bool {
    matches!(inputs.sleep_hours, Some(hours) if hours < SHORT_SLEEP_HOURS)
}

fn high_fatigue(inputs: &ActivityInputs) -> bool {
    at_least(inputs.fatigue, HIGH_DISTRESS_SCORE)
}

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    matches!(value, Some(v) if v >= threshold)
}
