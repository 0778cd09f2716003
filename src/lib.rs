//! Recovery Engine - deterministic post-operative recovery scoring
//!
//! Turns a patient's daily record (nutrition totals, activity totals and an
//! optional check-in) into an activity state, a 0-100 recovery index and
//! patient guidance through a fixed pipeline: goal resolution → metric
//! derivation → state classification → recovery index → trend → encoding.
//!
//! ## Modules
//!
//! - **Scoring core**: `goals`, `metrics`, `classifier`, `index` (pure, total)
//! - **Presentation**: `guidance`, `alerts`, `encoder`
//! - **Boundary**: `record`, `history`, `config`, `pipeline`, `ffi`

pub mod alerts;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod goals;
pub mod guidance;
pub mod history;
pub mod index;
pub mod metrics;
pub mod pipeline;
pub mod record;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use classifier::{classify, infer_state};
pub use config::EngineConfig;
pub use error::EngineError;
pub use goals::{resolve_goals, RecoveryTargets};
pub use index::{calculate_recovery_index, calculate_trend};
pub use metrics::compute_metrics;
pub use pipeline::{evaluate_day, evaluate_record, evaluate_series, RecoveryProcessor};
pub use record::{DailyRecord, RecordAdapter};
pub use types::{
    ActivityGoals, ActivityInputs, ActivityState, DerivedMetrics, RecoveryIndexResult,
    RecoveryReport, RiskLevel, Trend,
};

/// Engine version embedded in every report
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "recovery-engine";
