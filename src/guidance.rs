//! Patient and clinician guidance tables
//!
//! Static, immutable lookup tables keyed by activity state and risk level.
//! Patient-facing text is Dutch.

use serde::{Deserialize, Serialize};

use crate::index::{LOW_RISK_MIN_SCORE, MEDIUM_RISK_MIN_SCORE};
use crate::types::{ActivityState, RiskLevel};

/// Traffic-light color for an activity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateColor {
    Green,
    Orange,
    Red,
    Gray,
}

impl StateColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateColor::Green => "green",
            StateColor::Orange => "orange",
            StateColor::Red => "red",
            StateColor::Gray => "gray",
        }
    }
}

/// Color band for a recovery index score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Green,
    Yellow,
    Red,
}

impl ScoreBand {
    pub fn for_score(score: u32) -> Self {
        if score >= LOW_RISK_MIN_SCORE {
            ScoreBand::Green
        } else if score >= MEDIUM_RISK_MIN_SCORE {
            ScoreBand::Yellow
        } else {
            ScoreBand::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Green => "green",
            ScoreBand::Yellow => "yellow",
            ScoreBand::Red => "red",
        }
    }
}

/// Everything the presentation layer shows for one state
#[derive(Debug, PartialEq, Eq)]
pub struct StateGuidance {
    pub state: ActivityState,
    /// Short badge label
    pub label: &'static str,
    /// Spoken or written response to the patient
    pub response: &'static str,
    /// Recommended action codes, most important first
    pub actions: &'static [&'static str],
    pub color: StateColor,
    /// Needle position on the recovery balance gauge (0-100)
    pub gauge_position: u8,
}

static ADEQUATE: StateGuidance = StateGuidance {
    state: ActivityState::Adequate,
    label: "Op koers",
    response: "Mooi, je beweegt regelmatig. Houd dit ritme vast.",
    actions: &[
        "PRAISE_MAINTAIN",
        "DISTRIBUTE_ACTIVITY",
        "LIGHT_STRENGTH_ADDON_OPTION",
    ],
    color: StateColor::Green,
    gauge_position: 85,
};

static UNDERSTIMULATED: StateGuidance = StateGuidance {
    state: ActivityState::Understimulated,
    label: "Meer beweging nodig",
    response: "Je hebt vandaag nog weinig bewogen. Sta nu even op en loop 3–5 minuten.",
    actions: &[
        "PROMPT_MICRO_WALK",
        "BREAK_SITTING_PLAN",
        "PAIR_WITH_SNACK_IF_LOW_PROTEIN",
    ],
    color: StateColor::Orange,
    gauge_position: 45,
};

static STALLING: StateGuidance = StateGuidance {
    state: ActivityState::Stalling,
    label: "Te lang gezeten",
    response: "Je zit al een tijd achter elkaar. Sta even 2 minuten op, dat helpt je herstel.",
    actions: &[
        "STAND_UP_EACH_HOUR",
        "TWO_MINUTE_UPRIGHT_PLAN",
        "SEATED_EXERCISES_OPTION",
    ],
    color: StateColor::Orange,
    gauge_position: 35,
};

static FATIGUE_LIMITED: StateGuidance = StateGuidance {
    state: ActivityState::FatigueLimited,
    label: "Vermoeidheid",
    response: "Je bent moe vandaag. Kies voor rustig bewegen: even staan, paar passen, weer zitten.",
    actions: &[
        "PROTECT_ENERGY",
        "GENTLE_MOBILITY",
        "PAIN_CHECK_AND_ESCALATE_IF_RED_FLAGS",
    ],
    color: StateColor::Red,
    gauge_position: 20,
};

static OVERREACHED: StateGuidance = StateGuidance {
    state: ActivityState::Overreached,
    label: "Rustdag nodig",
    response: "Je deed veel, maar je lichaam heeft ook rust nodig. Vandaag wat rustiger is oké.",
    actions: &[
        "ACTIVE_RECOVERY_DAY",
        "HYDRATION_REST",
        "NO_GOAL_ESCALATION",
    ],
    color: StateColor::Red,
    gauge_position: 10,
};

static DATA_SPARSE: StateGuidance = StateGuidance {
    state: ActivityState::DataSparse,
    label: "Check-in nodig",
    response: "Ik mis je beweging van vandaag. Ben je een paar keer opgestaan en gelopen?",
    actions: &["ASK_ACTIVITY_MINIMUM_INPUT", "DEFAULT_MICRO_MOMENTS_PLAN"],
    color: StateColor::Gray,
    gauge_position: 50,
};

impl StateGuidance {
    /// Guidance entry for a state
    pub fn for_state(state: ActivityState) -> &'static StateGuidance {
        match state {
            ActivityState::Adequate => &ADEQUATE,
            ActivityState::Understimulated => &UNDERSTIMULATED,
            ActivityState::Stalling => &STALLING,
            ActivityState::FatigueLimited => &FATIGUE_LIMITED,
            ActivityState::Overreached => &OVERREACHED,
            ActivityState::DataSparse => &DATA_SPARSE,
        }
    }

    /// Owned copies of the action codes
    pub fn action_codes(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.to_string()).collect()
    }
}

/// Dutch label for a risk tier
pub fn risk_label(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "Goed herstel",
        RiskLevel::Medium => "Aandacht nodig",
        RiskLevel::High => "Escalatie overwegen",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_state_has_matching_entry() {
        for state in ActivityState::ALL {
            let guidance = StateGuidance::for_state(state);
            assert_eq!(guidance.state, state);
            assert!(!guidance.label.is_empty());
            assert!(!guidance.response.is_empty());
            assert!(!guidance.actions.is_empty());
            assert!(guidance.gauge_position <= 100);
        }
    }

    #[test]
    fn test_state_colors() {
        let color = |s| StateGuidance::for_state(s).color;
        assert_eq!(color(ActivityState::Adequate), StateColor::Green);
        assert_eq!(color(ActivityState::Understimulated), StateColor::Orange);
        assert_eq!(color(ActivityState::Stalling), StateColor::Orange);
        assert_eq!(color(ActivityState::FatigueLimited), StateColor::Red);
        assert_eq!(color(ActivityState::Overreached), StateColor::Red);
        assert_eq!(color(ActivityState::DataSparse), StateColor::Gray);
    }

    #[test]
    fn test_data_sparse_asks_for_input_first() {
        let guidance = StateGuidance::for_state(ActivityState::DataSparse);
        assert_eq!(guidance.actions[0], "ASK_ACTIVITY_MINIMUM_INPUT");
        assert_eq!(guidance.gauge_position, 50);
    }

    #[test]
    fn test_score_bands_follow_risk_tiers() {
        assert_eq!(ScoreBand::for_score(70), ScoreBand::Green);
        assert_eq!(ScoreBand::for_score(69), ScoreBand::Yellow);
        assert_eq!(ScoreBand::for_score(50), ScoreBand::Yellow);
        assert_eq!(ScoreBand::for_score(49), ScoreBand::Red);
    }

    #[test]
    fn test_risk_labels() {
        assert_eq!(risk_label(RiskLevel::Low), "Goed herstel");
        assert_eq!(risk_label(RiskLevel::High), "Escalatie overwegen");
    }
}
