//! Reinforcement ratio check shared by the reinforced channel and box culvert.

use serde::{Deserialize, Serialize};

/// Outcome of comparing the provided steel ratio against its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioStatus {
    /// ρ_min ≤ ρ ≤ ρ_max
    Adequate,
    /// ρ < ρ_min
    UnderReinforced,
    /// ρ > ρ_max
    OverReinforced,
}

impl RatioStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RatioStatus::Adequate => "adequate",
            RatioStatus::UnderReinforced => "under-reinforced",
            RatioStatus::OverReinforced => "over-reinforced",
        }
    }
}

/// Provided reinforcement ratio with its allowable range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementCheck {
    pub actual: f64,
    pub min: f64,
    pub max: f64,
    pub status: RatioStatus,
}

impl ReinforcementCheck {
    /// Classify `actual` against `[min, max]`.
    ///
    /// Adequate is tested first; anything outside the band is under-reinforced
    /// when below `min` and over-reinforced otherwise.
    pub fn evaluate(actual: f64, min: f64, max: f64) -> Self {
        let status = if min <= actual && actual <= max {
            RatioStatus::Adequate
        } else if actual < min {
            RatioStatus::UnderReinforced
        } else {
            RatioStatus::OverReinforced
        };
        ReinforcementCheck {
            actual,
            min,
            max,
            status,
        }
    }

    pub fn is_adequate(&self) -> bool {
        self.status == RatioStatus::Adequate
    }
}
