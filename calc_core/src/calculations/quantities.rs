//! # Quantity Results
//!
//! Every structure calculator returns a [`QuantityResult`]: a map from a fixed
//! vocabulary of [`QuantityKey`]s to non-negative magnitudes, plus whatever
//! design records apply to that structure type. Keys that are absent (or
//! zero) mean "not applicable to this structure".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::reinforcement::ReinforcementCheck;
use super::stepped_drop::{HydraulicJump, StabilityCheck};

/// The quantities a structure can produce, each priced by one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKey {
    /// Demolition of the existing structure (m³)
    Demolition,
    /// Common excavation (m³)
    Excavation,
    /// Compacted backfill (m³)
    Backfill,
    /// Structural concrete (m³)
    Concrete,
    /// Stone masonry (m³)
    Masonry,
    /// Reinforcing steel (kg)
    Reinforcement,
    /// Formwork contact area (m²)
    Formwork,
    /// Plastered area (m²)
    Plaster,
    /// Joint pointing area (m²)
    Pointing,
}

impl QuantityKey {
    /// All keys in bill-of-quantities order
    pub const ALL: [QuantityKey; 9] = [
        QuantityKey::Demolition,
        QuantityKey::Excavation,
        QuantityKey::Backfill,
        QuantityKey::Concrete,
        QuantityKey::Masonry,
        QuantityKey::Reinforcement,
        QuantityKey::Formwork,
        QuantityKey::Plaster,
        QuantityKey::Pointing,
    ];

    /// Unit of measurement
    pub fn unit(&self) -> &'static str {
        match self {
            QuantityKey::Demolition
            | QuantityKey::Excavation
            | QuantityKey::Backfill
            | QuantityKey::Concrete
            | QuantityKey::Masonry => "m3",
            QuantityKey::Reinforcement => "kg",
            QuantityKey::Formwork | QuantityKey::Plaster | QuantityKey::Pointing => "m2",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            QuantityKey::Demolition => "Demolition volume",
            QuantityKey::Excavation => "Excavation volume",
            QuantityKey::Backfill => "Backfill volume",
            QuantityKey::Concrete => "Concrete volume",
            QuantityKey::Masonry => "Masonry volume",
            QuantityKey::Reinforcement => "Reinforcement weight",
            QuantityKey::Formwork => "Formwork area",
            QuantityKey::Plaster => "Plaster area",
            QuantityKey::Pointing => "Pointing area",
        }
    }
}

/// Named quantity magnitudes.
///
/// Serializes as a flat JSON object: `{"concrete": 18.75, "excavation": 107.81}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantities(BTreeMap<QuantityKey, f64>);

impl Quantities {
    /// Empty map
    pub fn new() -> Self {
        Quantities(BTreeMap::new())
    }

    /// Magnitude for a key, zero when absent
    pub fn get(&self, key: QuantityKey) -> f64 {
        self.0.get(&key).copied().unwrap_or(0.0)
    }

    /// Set a magnitude. Negative values are stored as zero.
    pub fn set(&mut self, key: QuantityKey, value: f64) {
        self.0.insert(key, value.max(0.0));
    }

    /// Builder-style [`Quantities::set`]
    pub fn with(mut self, key: QuantityKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate over present keys in bill order
    pub fn iter(&self) -> impl Iterator<Item = (QuantityKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// True when no key is present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether a calculation produced quantities or bailed out on degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcStatus {
    Computed,
    /// Non-positive governing dimension; all quantities are zero
    NoData,
}

impl CalcStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CalcStatus::Computed => "computed",
            CalcStatus::NoData => "no data",
        }
    }
}

/// Output of a structure calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "status": "computed",
///   "quantities": {
///     "demolition": 0.0,
///     "excavation": 107.81,
///     "backfill": 40.08,
///     "concrete": 18.75,
///     "reinforcement": 1142.71,
///     "formwork": 160.0
///   },
///   "design_moment_knm": 1.339,
///   "recommended_thickness_cm": 10.0,
///   "reinforcement_check": {
///     "actual": 0.00997, "min": 0.005, "max": 0.02639, "status": "adequate"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityResult {
    pub status: CalcStatus,

    pub quantities: Quantities,

    /// Design moment per metre run (kN·m/m), for reinforced members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_moment_knm: Option<f64>,

    /// Advisory minimum thickness (cm); never enforced on the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_thickness_cm: Option<f64>,

    /// Reinforcement ratio check, for reinforced members
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reinforcement_check: Option<ReinforcementCheck>,

    /// Hydraulic jump analysis, for drop structures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hydraulics: Option<HydraulicJump>,

    /// Uplift and bearing check, for drop structures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability: Option<StabilityCheck>,
}

impl QuantityResult {
    /// A computed result carrying only quantities
    pub fn computed(quantities: Quantities) -> Self {
        QuantityResult {
            status: CalcStatus::Computed,
            quantities,
            design_moment_knm: None,
            recommended_thickness_cm: None,
            reinforcement_check: None,
            hydraulics: None,
            stability: None,
        }
    }

    /// The all-zero result returned for degenerate geometry
    pub fn no_data() -> Self {
        QuantityResult {
            status: CalcStatus::NoData,
            ..QuantityResult::computed(Quantities::new())
        }
    }

    /// Shorthand for `self.quantities.get(key)`
    pub fn get(&self, key: QuantityKey) -> f64 {
        self.quantities.get(key)
    }

    pub fn is_no_data(&self) -> bool {
        self.status == CalcStatus::NoData
    }
}

/// Demolition volume for a structure: the new-work volume when rehabilitating.
pub(crate) fn demolition_volume(new_volume: f64, rehabilitation: bool) -> f64 {
    if rehabilitation {
        new_volume
    } else {
        0.0
    }
}
