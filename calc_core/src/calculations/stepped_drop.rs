//! # Stepped Drop Structure with USBR Stilling Basins
//!
//! Hydraulic sizing and quantities for a chain of equal vertical drops, each
//! followed by a stilling basin.
//!
//! ## Procedure
//!
//! 1. Split the total drop into `n = ⌈H_total / H_step⌉` equal steps
//! 2. Free-fall velocity, toe depth and Froude number at each step
//! 3. Conjugate depth y2 and USBR basin type from the Froude ladder
//! 4. Basin length k·y2, nappe length from the drop-number correlation
//! 5. Uplift and bearing check on the downstream (critical) segment
//! 6. Floor, sill and wall concrete, with steel from a kg/m³ ratio
//!
//! In economy mode with steps no higher than 1.2 m, only the last basin is
//! full length; intermediate basins are shortened to 0.5 m.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::stepped_drop::{calculate, BasinType, SteppedDropInput};
//!
//! let result = calculate(&SteppedDropInput::default());
//! let jump = result.hydraulics.unwrap();
//! assert_eq!(jump.steps, 2);
//! assert_eq!(jump.basin_type, BasinType::UsbrTypeIV);
//! ```

use serde::{Deserialize, Serialize};

use super::quantities::{demolition_volume, QuantityKey, QuantityResult, Quantities};
use crate::equations::{conjugate_depth, drop_length, free_fall_velocity, froude_number, GAMMA_WATER};

/// Unit weight of reinforced concrete (kN/m³)
pub const GAMMA_CONCRETE: f64 = 24.0;

/// Required factor of safety against flotation
pub const UPLIFT_SAFETY_THRESHOLD: f64 = 1.5;

/// Safety factor reported when there is no uplift at all
pub const NO_UPLIFT_SAFETY_FACTOR: f64 = 99.0;

/// Step height at or below which economy mode may shorten basins (m)
pub const ECONOMY_MAX_STEP_HEIGHT_M: f64 = 1.2;

/// Shortened intermediate basin length in economy mode (m)
pub const ECONOMY_BASIN_LENGTH_M: f64 = 0.5;

/// Freeboard above the conjugate depth for the side walls (m)
pub const WALL_FREEBOARD_M: f64 = 0.6;

/// Sill (crest) thickness per step (m)
pub const SILL_THICKNESS_M: f64 = 0.4;

/// Earthworks as multiples of the concrete volume
pub const EXCAVATION_FACTOR: f64 = 1.3;
pub const BACKFILL_FACTOR: f64 = 0.3;

/// Steel ratios (kg/m³)
const BASE_STEEL_RATIO: f64 = 120.0;
const UPLIFT_STEEL_INCREMENT: f64 = 10.0;
const TYPE_III_STEEL_INCREMENT: f64 = 15.0;

const MIN_STEP_HEIGHT_M: f64 = 0.1;
const FALLBACK_WIDTH_M: f64 = 1.0;
const MIN_DISCHARGE_M3S: f64 = 0.1;

/// Input for a stepped drop structure.
///
/// ## JSON Example
///
/// ```json
/// {
///   "discharge_m3s": 1.5,
///   "total_drop_m": 3.0,
///   "max_step_height_m": 1.5,
///   "width_m": 1.5,
///   "floor_thickness_m": 0.25,
///   "wall_thickness_m": 0.25,
///   "allowable_bearing_kpa": 150.0,
///   "economy_mode": true,
///   "rehabilitation": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteppedDropInput {
    /// Design discharge Q (m³/s)
    pub discharge_m3s: f64,

    /// Total drop H_total (m)
    pub total_drop_m: f64,

    /// Maximum height of one step (m)
    pub max_step_height_m: f64,

    /// Channel width B (m)
    pub width_m: f64,

    pub floor_thickness_m: f64,

    pub wall_thickness_m: f64,

    /// Allowable soil bearing pressure (kPa)
    pub allowable_bearing_kpa: f64,

    /// Shorten intermediate basins on low drops
    #[serde(default)]
    pub economy_mode: bool,

    #[serde(default)]
    pub rehabilitation: bool,
}

impl Default for SteppedDropInput {
    fn default() -> Self {
        SteppedDropInput {
            discharge_m3s: 1.5,
            total_drop_m: 3.0,
            max_step_height_m: 1.5,
            width_m: 1.5,
            floor_thickness_m: 0.25,
            wall_thickness_m: 0.25,
            allowable_bearing_kpa: 150.0,
            economy_mode: true,
            rehabilitation: false,
        }
    }
}

impl SteppedDropInput {
    /// Replace non-positive step height, width and discharge with safe minimums.
    pub fn clamped(&self) -> SteppedDropInput {
        let mut input = self.clone();
        if input.max_step_height_m <= 0.0 {
            tracing::warn!(value = input.max_step_height_m, "step height clamped to {}", MIN_STEP_HEIGHT_M);
            input.max_step_height_m = MIN_STEP_HEIGHT_M;
        }
        if input.width_m <= 0.0 {
            tracing::warn!(value = input.width_m, "drop width clamped to {}", FALLBACK_WIDTH_M);
            input.width_m = FALLBACK_WIDTH_M;
        }
        if input.discharge_m3s <= 0.0 {
            tracing::warn!(value = input.discharge_m3s, "discharge clamped to {}", MIN_DISCHARGE_M3S);
            input.discharge_m3s = MIN_DISCHARGE_M3S;
        }
        input
    }
}

/// USBR stilling basin classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasinType {
    /// Fr1 < 1.7
    UndularFlow,
    /// 1.7 ≤ Fr1 < 2.5
    UsbrTypeI,
    /// 2.5 ≤ Fr1 ≤ 4.5
    UsbrTypeIV,
    /// Fr1 > 4.5, V1 < 18 m/s
    UsbrTypeIII,
    /// Fr1 > 4.5, V1 ≥ 18 m/s
    UsbrTypeII,
}

impl BasinType {
    /// Classify a jump by its toe Froude number and velocity.
    ///
    /// The branches overlap at their boundaries and are tested in order.
    ///
    /// # Example
    /// ```rust
    /// use calc_core::calculations::stepped_drop::BasinType;
    ///
    /// assert_eq!(BasinType::classify(1.0, 5.0), BasinType::UndularFlow);
    /// assert_eq!(BasinType::classify(5.0, 20.0), BasinType::UsbrTypeII);
    /// ```
    pub fn classify(fr1: f64, v1: f64) -> BasinType {
        if fr1 < 1.7 {
            BasinType::UndularFlow
        } else if fr1 < 2.5 {
            BasinType::UsbrTypeI
        } else if fr1 <= 4.5 {
            BasinType::UsbrTypeIV
        } else if v1 < 18.0 {
            BasinType::UsbrTypeIII
        } else {
            BasinType::UsbrTypeII
        }
    }

    /// Basin length as a multiple of the conjugate depth
    pub fn length_factor(&self) -> f64 {
        match self {
            BasinType::UndularFlow => 4.0,
            BasinType::UsbrTypeI => 5.0,
            BasinType::UsbrTypeIV => 6.0,
            BasinType::UsbrTypeIII => 2.7,
            BasinType::UsbrTypeII => 4.3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BasinType::UndularFlow => "undular flow",
            BasinType::UsbrTypeI => "USBR Type I",
            BasinType::UsbrTypeIV => "USBR Type IV",
            BasinType::UsbrTypeIII => "USBR Type III",
            BasinType::UsbrTypeII => "USBR Type II",
        }
    }
}

/// Whether intermediate basins were shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignMode {
    /// Full basin on the last step only
    Economy,
    /// Full basin on every step
    Standard,
}

impl DesignMode {
    pub fn label(&self) -> &'static str {
        match self {
            DesignMode::Economy => "economy",
            DesignMode::Standard => "standard",
        }
    }
}

/// Hydraulic jump and layout of the drop chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydraulicJump {
    /// Number of steps
    pub steps: u32,
    /// Height of each step (m)
    pub step_height_m: f64,
    /// Unit discharge q (m³/s/m)
    pub unit_discharge: f64,
    /// Toe velocity V1 (m/s)
    pub velocity_ms: f64,
    /// Toe depth y1 (m)
    pub y1_m: f64,
    /// Conjugate depth y2 (m)
    pub y2_m: f64,
    pub froude: f64,
    pub basin_type: BasinType,
    /// Nappe length of one drop (m)
    pub drop_length_m: f64,
    pub intermediate_basin_m: f64,
    pub final_basin_m: f64,
    /// Overall length of the structure (m)
    pub total_length_m: f64,
    pub design_mode: DesignMode,
}

impl HydraulicJump {
    /// One-line description, e.g. `USBR Type IV (2 steps) - standard`
    pub fn summary(&self) -> String {
        let noun = if self.steps == 1 { "step" } else { "steps" };
        format!(
            "{} ({} {}) - {}",
            self.basin_type.label(),
            self.steps,
            noun,
            self.design_mode.label()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpliftStatus {
    Safe,
    UpliftDanger,
}

impl UpliftStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UpliftStatus::Safe => "safe",
            UpliftStatus::UpliftDanger => "uplift danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BearingStatus {
    Safe,
    BearingFailure,
}

impl BearingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BearingStatus::Safe => "safe",
            BearingStatus::BearingFailure => "bearing failure",
        }
    }
}

/// Flotation and soil bearing check on the downstream segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityCheck {
    /// Floor self-weight plus water on the segment (kN)
    pub weight_kn: f64,
    /// Resultant uplift under the segment (kN)
    pub uplift_kn: f64,
    pub safety_factor: f64,
    pub uplift_status: UpliftStatus,
    /// Net bearing pressure, never negative (kPa)
    pub net_pressure_kpa: f64,
    pub allowable_kpa: f64,
    pub bearing_status: BearingStatus,
}

impl StabilityCheck {
    /// Evaluate the segment of length `segment_m` below the last step.
    pub fn evaluate(
        input: &SteppedDropInput,
        y1: f64,
        y2: f64,
        step_height: f64,
        segment_m: f64,
    ) -> StabilityCheck {
        let b = input.width_m;
        let slab = segment_m * b * input.floor_thickness_m * GAMMA_CONCRETE;
        let water = 0.5 * (y1 + y2) * segment_m * b * GAMMA_WATER;
        let weight = slab + water;

        // Trapezoidal pressure from y2 + H/2 upstream down to y2 at the end
        let upstream_head = y2 + 0.5 * step_height;
        let uplift = 0.5 * (upstream_head + y2) * segment_m * b * GAMMA_WATER;

        let safety_factor = if uplift > 0.0 {
            weight / uplift
        } else {
            NO_UPLIFT_SAFETY_FACTOR
        };
        let area = b * segment_m;
        let net_pressure = if area > 0.0 {
            ((weight - uplift) / area).max(0.0)
        } else {
            0.0
        };

        StabilityCheck {
            weight_kn: weight,
            uplift_kn: uplift,
            safety_factor,
            uplift_status: if safety_factor >= UPLIFT_SAFETY_THRESHOLD {
                UpliftStatus::Safe
            } else {
                UpliftStatus::UpliftDanger
            },
            net_pressure_kpa: net_pressure,
            allowable_kpa: input.allowable_bearing_kpa,
            bearing_status: if net_pressure <= input.allowable_bearing_kpa {
                BearingStatus::Safe
            } else {
                BearingStatus::BearingFailure
            },
        }
    }

    pub fn is_safe(&self) -> bool {
        self.uplift_status == UpliftStatus::Safe && self.bearing_status == BearingStatus::Safe
    }
}

/// Size the drop chain and its basins.
pub fn hydraulic_jump(input: &SteppedDropInput) -> HydraulicJump {
    let steps = ((input.total_drop_m / input.max_step_height_m).ceil() as u32).max(1);
    let h_real = input.total_drop_m / steps as f64;

    let q = input.discharge_m3s / input.width_m;
    let v1 = free_fall_velocity(h_real);
    let y1 = q / v1;
    let fr1 = froude_number(v1, y1);
    let y2 = conjugate_depth(y1, fr1);

    let basin_type = BasinType::classify(fr1, v1);
    let standard_basin = basin_type.length_factor() * y2;
    let l_drop = drop_length(q, h_real);

    let design_mode = if input.economy_mode && h_real <= ECONOMY_MAX_STEP_HEIGHT_M {
        DesignMode::Economy
    } else {
        DesignMode::Standard
    };
    let intermediate_basin = match design_mode {
        DesignMode::Economy => ECONOMY_BASIN_LENGTH_M,
        DesignMode::Standard => standard_basin,
    };

    let intermediate_steps = (steps - 1) as f64;
    let total_length =
        intermediate_steps * (l_drop + intermediate_basin) + (l_drop + standard_basin);

    HydraulicJump {
        steps,
        step_height_m: h_real,
        unit_discharge: q,
        velocity_ms: v1,
        y1_m: y1,
        y2_m: y2,
        froude: fr1,
        basin_type,
        drop_length_m: l_drop,
        intermediate_basin_m: intermediate_basin,
        final_basin_m: standard_basin,
        total_length_m: total_length,
        design_mode,
    }
}

/// Compute hydraulics, stability and quantities for a stepped drop.
pub fn calculate(input: &SteppedDropInput) -> QuantityResult {
    let input = input.clamped();
    if input.total_drop_m <= 0.0 {
        tracing::warn!(total_drop_m = input.total_drop_m, "drop has no positive height, returning no data");
        return QuantityResult::no_data();
    }

    let jump = hydraulic_jump(&input);
    let segment = jump.drop_length_m + jump.final_basin_m;
    let stability = StabilityCheck::evaluate(&input, jump.y1_m, jump.y2_m, jump.step_height_m, segment);

    tracing::debug!(
        steps = jump.steps,
        froude = jump.froude,
        y2 = jump.y2_m,
        total_length = jump.total_length_m,
        sf = stability.safety_factor,
        "stepped drop"
    );

    let l_total = jump.total_length_m;
    let b = input.width_m;
    let n = jump.steps as f64;
    let wall_height = jump.y2_m + WALL_FREEBOARD_M;

    let floor = l_total * b * input.floor_thickness_m;
    let sills = n * b * jump.step_height_m * SILL_THICKNESS_M;
    let walls = 2.0 * l_total * wall_height * input.wall_thickness_m;
    let concrete = floor + sills + walls;

    let mut steel_ratio = BASE_STEEL_RATIO;
    if stability.safety_factor < UPLIFT_SAFETY_THRESHOLD {
        steel_ratio += UPLIFT_STEEL_INCREMENT;
    }
    if jump.basin_type == BasinType::UsbrTypeIII {
        steel_ratio += TYPE_III_STEEL_INCREMENT;
    }

    let wall_faces = 2.0 * l_total * wall_height;

    let quantities = Quantities::new()
        .with(QuantityKey::Concrete, concrete)
        .with(QuantityKey::Excavation, concrete * EXCAVATION_FACTOR)
        .with(QuantityKey::Backfill, concrete * BACKFILL_FACTOR)
        .with(QuantityKey::Reinforcement, concrete * steel_ratio)
        .with(QuantityKey::Formwork, wall_faces + n * b * jump.step_height_m)
        .with(QuantityKey::Plaster, wall_faces)
        .with(QuantityKey::Demolition, demolition_volume(concrete, input.rehabilitation));

    QuantityResult {
        hydraulics: Some(jump),
        stability: Some(stability),
        ..QuantityResult::computed(quantities)
    }
}
