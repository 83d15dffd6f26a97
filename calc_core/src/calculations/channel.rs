//! # Reinforced Concrete Channel
//!
//! Quantities for a cast-in-place U-section (m = 0) or trapezoidal (m > 0)
//! reinforced concrete irrigation channel, with a screening check of the wall
//! reinforcement.
//!
//! ## Assumptions
//!
//! - Wall moment from full hydrostatic head, cantilevered from the floor:
//!   Mu = 1.6 × γw·H³/6 per metre run
//! - 40 mm cover; bar spacing entered in cm
//! - Excavation envelope: 0.2 m working space each side of the outer base,
//!   0.2 m below the floor, sides cut at 1:0.5
//! - Backfill is 45% of the excavated void left around the structure
//! - Distribution steel taken as 20% on top of the main bars
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::channel::{calculate, ChannelInput};
//! use calc_core::calculations::QuantityKey;
//!
//! let input = ChannelInput::default(); // 0.8 m × 0.6 m U-ditch, 50 m
//! let result = calculate(&input);
//!
//! let concrete = result.get(QuantityKey::Concrete);
//! assert!((concrete - 18.75).abs() < 1e-9);
//! assert!(result.get(QuantityKey::Excavation) > concrete);
//! ```

use serde::{Deserialize, Serialize};

use super::quantities::{demolition_volume, QuantityKey, QuantityResult, Quantities};
use super::reinforcement::ReinforcementCheck;
use crate::equations::{
    bar_count, bar_unit_weight, effective_depth_mm, reinforcement_ratio, rho_max, rho_min,
    slant_length, steel_area_per_meter, strength_thickness_m, trapezoid_area, trapezoid_top_width,
    GAMMA_WATER,
};
use crate::units::{Centimeters, Meters};

/// LRFD load factor on the hydrostatic wall load
const LOAD_FACTOR: f64 = 1.6;

/// Total horizontal working space added to the outer base width (m)
const WORKING_SPACE_M: f64 = 0.4;

/// Over-excavation below the floor (m)
const CLEARANCE_BELOW_M: f64 = 0.2;

/// Side slope of the excavation cut (1:m)
const EXCAVATION_SLOPE: f64 = 0.5;

/// Share of the void around the structure that is backfilled
pub const BACKFILL_FACTOR: f64 = 0.45;

/// Distribution-bar allowance on the main steel
pub const DISTRIBUTION_STEEL_FACTOR: f64 = 1.2;

/// Absolute minimum wall thickness (m)
const MIN_THICKNESS_M: f64 = 0.10;

/// Slant wall length per unit of minimum thickness
const SLENDERNESS_LIMIT: f64 = 12.0;

/// Input for a reinforced concrete channel.
///
/// ## JSON Example
///
/// ```json
/// {
///   "height_m": 0.8,
///   "base_width_m": 0.6,
///   "side_slope": 0.0,
///   "length_m": 50.0,
///   "thickness_cm": 15.0,
///   "bar_diameter_mm": 10.0,
///   "bar_spacing_cm": 15.0,
///   "layers": 2,
///   "waste_pct": 5.0,
///   "fc_mpa": 20.0,
///   "fy_mpa": 280.0,
///   "rehabilitation": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInput {
    /// Inner height H (m)
    pub height_m: f64,

    /// Inner base width B (m)
    pub base_width_m: f64,

    /// Wall slope 1:m (0 = vertical walls)
    pub side_slope: f64,

    /// Channel length (m)
    pub length_m: f64,

    /// Wall and floor thickness (cm)
    pub thickness_cm: f64,

    /// Main bar diameter (mm)
    pub bar_diameter_mm: f64,

    /// Main bar spacing (cm)
    pub bar_spacing_cm: f64,

    /// Number of reinforcement layers
    pub layers: u32,

    /// Steel cutting waste (%)
    pub waste_pct: f64,

    /// Concrete compressive strength f'c (MPa)
    pub fc_mpa: f64,

    /// Steel yield strength fy (MPa)
    pub fy_mpa: f64,

    /// Replaces an existing structure (adds demolition)
    #[serde(default)]
    pub rehabilitation: bool,
}

impl Default for ChannelInput {
    fn default() -> Self {
        ChannelInput {
            height_m: 0.8,
            base_width_m: 0.6,
            side_slope: 0.0,
            length_m: 50.0,
            thickness_cm: 15.0,
            bar_diameter_mm: 10.0,
            bar_spacing_cm: 15.0,
            layers: 2,
            waste_pct: 5.0,
            fc_mpa: 20.0,
            fy_mpa: 280.0,
            rehabilitation: false,
        }
    }
}

impl ChannelInput {
    /// Height or length not positive: nothing to quantify
    pub fn is_degenerate(&self) -> bool {
        self.height_m <= 0.0 || self.length_m <= 0.0
    }

    /// Wall length along the slope (m)
    pub fn slant_height_m(&self) -> f64 {
        slant_length(self.height_m, self.side_slope)
    }

    /// Wall thickness (m)
    pub fn thickness_m(&self) -> f64 {
        Meters::from(Centimeters(self.thickness_cm)).value()
    }

    /// Factored wall moment per metre run (kN·m/m)
    pub fn design_moment_knm(&self) -> f64 {
        LOAD_FACTOR * (1.0 / 6.0) * GAMMA_WATER * self.height_m.powi(3)
    }

    /// Bottom width, top width and depth of the excavation cut (m)
    pub fn excavation_section_m(&self) -> (f64, f64, f64) {
        let t = self.thickness_m();
        let bottom = self.base_width_m + 2.0 * slant_length(t, self.side_slope) + WORKING_SPACE_M;
        let depth = self.height_m + t + CLEARANCE_BELOW_M;
        let top = trapezoid_top_width(bottom, depth, EXCAVATION_SLOPE);
        (bottom, top, depth)
    }
}

/// Compute quantities and the reinforcement check for a channel.
///
/// Never fails: a non-positive height or length gives a "no data" result.
pub fn calculate(input: &ChannelInput) -> QuantityResult {
    if input.is_degenerate() {
        tracing::warn!(
            height_m = input.height_m,
            length_m = input.length_m,
            "reinforced channel has no positive height/length, returning no data"
        );
        return QuantityResult::no_data();
    }

    let h = input.height_m;
    let b = input.base_width_m;
    let l = input.length_m;
    let t = input.thickness_m();
    let slant = input.slant_height_m();
    let layers = f64::from(input.layers);

    // === Structural screening ===
    let mu = input.design_moment_knm();
    let recommended_cm = Centimeters::from(Meters(
        strength_thickness_m(mu)
            .max(slant / SLENDERNESS_LIMIT)
            .max(MIN_THICKNESS_M),
    ));

    let d_eff = effective_depth_mm(input.thickness_cm, input.bar_diameter_mm);
    let as_per_m = steel_area_per_meter(input.bar_diameter_mm, input.bar_spacing_cm, layers);
    let check = ReinforcementCheck::evaluate(
        reinforcement_ratio(as_per_m, d_eff),
        rho_min(input.fy_mpa),
        rho_max(input.fc_mpa, input.fy_mpa),
    );

    // === Volumes ===
    let concrete = (b + 2.0 * slant + 2.0 * t) * t * l;

    let (exc_bottom, exc_top, exc_depth) = input.excavation_section_m();
    let excavation = trapezoid_area(exc_bottom, exc_top, exc_depth) * l;
    let backfill = ((excavation - concrete) * BACKFILL_FACTOR).max(0.0);

    let developed_width = b + 2.0 * slant;
    let steel = developed_width
        * bar_count(l, input.bar_spacing_cm)
        * layers
        * bar_unit_weight(input.bar_diameter_mm)
        * DISTRIBUTION_STEEL_FACTOR
        * (1.0 + input.waste_pct / 100.0);

    // Both faces of both walls
    let formwork = 2.0 * slant * l * 2.0;

    tracing::debug!(mu, d_eff, rho = check.actual, concrete, excavation, "reinforced channel");

    let quantities = Quantities::new()
        .with(QuantityKey::Concrete, concrete)
        .with(QuantityKey::Excavation, excavation)
        .with(QuantityKey::Backfill, backfill)
        .with(QuantityKey::Reinforcement, steel)
        .with(QuantityKey::Formwork, formwork)
        .with(QuantityKey::Demolition, demolition_volume(concrete, input.rehabilitation));

    QuantityResult {
        design_moment_knm: Some(mu),
        recommended_thickness_cm: Some(recommended_cm.value()),
        reinforcement_check: Some(check),
        ..QuantityResult::computed(quantities)
    }
}
