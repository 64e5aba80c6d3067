use serde::{Deserialize, Serialize};

use super::super::levels::ThresholdTable;

/// Tolerance applied on top of the threshold so rates that land on the
/// boundary after float rounding still pass.
pub const DEFAULT_TOLERANCE: f64 = 0.001;
pub const DEFAULT_BACKING_MIN_SCORE: f64 = 0.25;

pub const ACTION_NONE: &str = "Ninguna";
pub const ACTION_MANUAL_REVIEW: &str = "Revisión manual";

/// What a criterion reports when the position declares no functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPositionPolicy {
    #[default]
    Pass,
    Fail,
}

impl EmptyPositionPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// Rule configuration for the three-criteria validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub thresholds: ThresholdTable,
    pub tolerance: f64,
    pub empty_position_policy: EmptyPositionPolicy,
    pub approved_action: String,
    pub rejected_action: String,
    pub backing_min_score: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            tolerance: DEFAULT_TOLERANCE,
            empty_position_policy: EmptyPositionPolicy::Pass,
            approved_action: ACTION_NONE.to_string(),
            rejected_action: ACTION_MANUAL_REVIEW.to_string(),
            backing_min_score: DEFAULT_BACKING_MIN_SCORE,
        }
    }
}
