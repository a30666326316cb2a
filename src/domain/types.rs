//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during calibration
//! - exported to JSON for reporting
//! - persisted (in rounded form) through the item-statistics store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum distinct respondents required for a calibration run.
///
/// Below this, JMLE item-parameter bias (the incidental-parameter
/// problem) is large enough that estimates should not be trusted.
pub const DEFAULT_MIN_RESPONDENTS: usize = 200;

/// Minimum items that must survive extreme-item filtering.
///
/// Joint estimation needs enough items to anchor the ability scale.
pub const DEFAULT_MIN_ITEMS: usize = 3;

/// Default proportion-correct exclusion bounds.
///
/// Outside these, the logistic curve is not identifiable from finite
/// data and estimation becomes numerically unstable.
pub const DEFAULT_P_VALUE_MIN: f64 = 0.05;
pub const DEFAULT_P_VALUE_MAX: f64 = 0.95;

/// Default outer-iteration cap and convergence threshold.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01;

/// Inner Newton-Raphson iteration budget per parameter update.
pub const DEFAULT_NEWTON_ITERATIONS: usize = 20;

/// One observed answer: `response` is already binarized to {0.0, 1.0}
/// by the external scoring collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub respondent_id: String,
    pub item_id: String,
    pub response: f64,
}

/// 2PL parameters for one item.
///
/// Updated in place across calibration iterations and frozen once the
/// calibrator terminates. Invariant after any update:
/// `discrimination ∈ [0.1, 4.0]`, `difficulty ∈ [-4.0, 4.0]`.
///
/// Standard errors may be NaN, meaning "unknown precision" (zero
/// observed information), which is advisory rather than fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemParameters {
    pub item_id: String,
    pub discrimination: f64,
    pub difficulty: f64,
    pub se_discrimination: f64,
    pub se_difficulty: f64,
}

impl ItemParameters {
    /// Starting parameters for calibration: (a, b) = (1.0, 0.0).
    pub fn initial(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            discrimination: 1.0,
            difficulty: 0.0,
            se_discrimination: f64::NAN,
            se_difficulty: f64::NAN,
        }
    }
}

/// Per-item calibration entry in a `CalibrationResult`, in surviving
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCalibration {
    pub item_id: String,
    pub difficulty: f64,
    pub discrimination: f64,
    pub se_discrimination: f64,
    pub se_difficulty: f64,
}

/// Outcome of one calibration run (no persistence side effects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub competency_id: String,
    /// Items surviving extreme-item filtering.
    pub item_count: usize,
    pub respondent_count: usize,
    /// Outer iterations actually performed.
    pub iterations: usize,
    /// `false` means the iteration budget ran out before the change
    /// threshold was reached; the estimates are still the best current
    /// ones and the caller decides whether to accept them.
    pub converged: bool,
    /// Largest absolute change in any a or b during the final iteration.
    pub max_parameter_change: f64,
    pub items: Vec<ItemCalibration>,
}

/// A persisted item-statistics record, as written through the store.
///
/// Values are rounded to a fixed 4-decimal scale at the persistence
/// boundary; `guessing` is always 0.0 because only 2PL is calibrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStatisticsRecord {
    pub item_id: String,
    pub discrimination: f64,
    pub difficulty: f64,
    pub guessing: f64,
    pub calibrated_at: DateTime<Utc>,
}

/// A full run's configuration.
///
/// All thresholds are named defaults with an override seam; most callers
/// should use `CalibrationConfig::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Minimum distinct respondents (validation threshold).
    pub min_respondents: usize,
    /// Minimum items surviving the p-value filter.
    pub min_items: usize,
    /// Exclude items with proportion-correct below this.
    pub p_value_min: f64,
    /// Exclude items with proportion-correct above this.
    pub p_value_max: f64,
    /// Outer JMLE iteration cap (guarantees termination).
    pub max_iterations: usize,
    /// Converged when no a or b moved by more than this in an iteration.
    pub convergence_threshold: f64,
    /// Inner Newton-Raphson budget per parameter update.
    pub newton_iterations: usize,
    /// Ability clamp, applied after every Newton update.
    pub theta_bounds: (f64, f64),
    /// Discrimination clamp.
    pub discrimination_bounds: (f64, f64),
    /// Difficulty clamp.
    pub difficulty_bounds: (f64, f64),
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_respondents: DEFAULT_MIN_RESPONDENTS,
            min_items: DEFAULT_MIN_ITEMS,
            p_value_min: DEFAULT_P_VALUE_MIN,
            p_value_max: DEFAULT_P_VALUE_MAX,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            newton_iterations: DEFAULT_NEWTON_ITERATIONS,
            theta_bounds: (-4.0, 4.0),
            discrimination_bounds: (0.1, 4.0),
            difficulty_bounds: (-4.0, 4.0),
        }
    }
}
