//! # Reinforced Concrete Box Culvert
//!
//! Quantities for a single-cell cast-in-place box under a road or embankment.
//!
//! ## Assumptions
//!
//! - Slab moment from 1.5 m of fill at 18 kN/m³ plus 10 kN/m² traffic,
//!   over the centreline span: Mu = (18·1.5 + 10)·(w + t)² / 10
//! - Two layers of main bars; maximum steel ratio fixed at 0.025
//! - Earthworks use rough void ratios on the concrete volume rather than a
//!   cut profile: excavation = V / 0.2, backfill = V / 0.5
//! - The slab design depends only on the cross-section. A barrel with no
//!   positive length still gets its moment and ratio check, with every
//!   quantity zero; only a missing opening gives "no data"
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::box_culvert::{calculate, BoxCulvertInput};
//! use calc_core::calculations::QuantityKey;
//!
//! let result = calculate(&BoxCulvertInput::default()); // 1 m × 1 m × 6 m, 20 cm walls
//! assert!((result.get(QuantityKey::Concrete) - 5.76).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::quantities::{demolition_volume, QuantityKey, QuantityResult, Quantities};
use super::reinforcement::ReinforcementCheck;
use crate::equations::reinforcement::FIXED_RHO_MAX;
use crate::equations::{
    bar_count, bar_unit_weight, effective_depth_mm, hollow_box_volume, reinforcement_ratio,
    rho_min, steel_area_per_meter, strength_thickness_m,
};
use crate::units::{Centimeters, Meters};

/// Fill unit weight (kN/m³) × fill height (m)
const FILL_PRESSURE_KPA: f64 = 18.0 * 1.5;

/// Traffic surcharge (kN/m²)
const TRAFFIC_SURCHARGE_KPA: f64 = 10.0;

pub const MAIN_LAYERS: f64 = 2.0;

/// Concrete volume share of the excavation
pub const EXCAVATION_VOID_RATIO: f64 = 0.2;

/// Concrete volume share of the backfill
pub const BACKFILL_VOID_RATIO: f64 = 0.5;

pub const DISTRIBUTION_STEEL_FACTOR: f64 = 1.2;

/// Absolute minimum slab/wall thickness (cm)
const MIN_THICKNESS_CM: f64 = 15.0;

/// Input for a box culvert.
///
/// ## JSON Example
///
/// ```json
/// {
///   "width_m": 1.0,
///   "height_m": 1.0,
///   "length_m": 6.0,
///   "thickness_cm": 20.0,
///   "bar_diameter_mm": 13.0,
///   "bar_spacing_cm": 15.0,
///   "fc_mpa": 25.0,
///   "fy_mpa": 400.0,
///   "rehabilitation": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxCulvertInput {
    /// Clear inner width w (m)
    pub width_m: f64,

    /// Clear inner height h (m)
    pub height_m: f64,

    /// Barrel length p (m)
    pub length_m: f64,

    /// Wall and slab thickness (cm)
    pub thickness_cm: f64,

    pub bar_diameter_mm: f64,

    pub bar_spacing_cm: f64,

    pub fc_mpa: f64,

    pub fy_mpa: f64,

    #[serde(default)]
    pub rehabilitation: bool,
}

impl Default for BoxCulvertInput {
    fn default() -> Self {
        BoxCulvertInput {
            width_m: 1.0,
            height_m: 1.0,
            length_m: 6.0,
            thickness_cm: 20.0,
            bar_diameter_mm: 13.0,
            bar_spacing_cm: 15.0,
            fc_mpa: 25.0,
            fy_mpa: 400.0,
            rehabilitation: false,
        }
    }
}

impl BoxCulvertInput {
    /// Opening width or height not positive
    pub fn is_degenerate(&self) -> bool {
        self.width_m <= 0.0 || self.height_m <= 0.0
    }

    pub fn thickness_m(&self) -> f64 {
        Meters::from(Centimeters(self.thickness_cm)).value()
    }

    /// Top slab moment per metre run (kN·m/m)
    pub fn design_moment_knm(&self) -> f64 {
        let span = self.width_m + self.thickness_m();
        (1.0 / 10.0) * (FILL_PRESSURE_KPA + TRAFFIC_SURCHARGE_KPA) * span * span
    }
}

/// Compute quantities and the reinforcement check for a box culvert.
pub fn calculate(input: &BoxCulvertInput) -> QuantityResult {
    if input.is_degenerate() {
        tracing::warn!(
            width_m = input.width_m,
            height_m = input.height_m,
            "box culvert has no positive opening, returning no data"
        );
        return QuantityResult::no_data();
    }

    let w = input.width_m;
    let h = input.height_m;
    let p = input.length_m;
    let t = input.thickness_m();

    let mu = input.design_moment_knm();
    let recommended_cm = Centimeters::from(Meters(strength_thickness_m(mu)))
        .value()
        .max(Centimeters::from(Meters((w + t) / 12.0)).value())
        .max(MIN_THICKNESS_CM);

    let d_eff = effective_depth_mm(input.thickness_cm, input.bar_diameter_mm);
    let as_per_m = steel_area_per_meter(input.bar_diameter_mm, input.bar_spacing_cm, MAIN_LAYERS);
    let check = ReinforcementCheck::evaluate(
        reinforcement_ratio(as_per_m, d_eff),
        rho_min(input.fy_mpa),
        FIXED_RHO_MAX,
    );

    let design = |quantities: Quantities| QuantityResult {
        design_moment_knm: Some(mu),
        recommended_thickness_cm: Some(recommended_cm),
        reinforcement_check: Some(check),
        ..QuantityResult::computed(quantities)
    };

    if p <= 0.0 {
        tracing::warn!(length_m = p, "box culvert has no positive length, quantities are zero");
        return design(Quantities::new());
    }

    let concrete = hollow_box_volume(w, h, t, p);
    let excavation = concrete / EXCAVATION_VOID_RATIO;
    let backfill = concrete / BACKFILL_VOID_RATIO;

    // Outer perimeter, two layers
    let perimeter = 2.0 * ((w + 2.0 * t) + (h + 2.0 * t));
    let steel = perimeter
        * MAIN_LAYERS
        * bar_count(p, input.bar_spacing_cm)
        * bar_unit_weight(input.bar_diameter_mm)
        * DISTRIBUTION_STEEL_FACTOR;

    let formwork = (2.0 * w + 2.0 * h) * p;

    tracing::debug!(mu, d_eff, rho = check.actual, concrete, "box culvert");

    let quantities = Quantities::new()
        .with(QuantityKey::Concrete, concrete)
        .with(QuantityKey::Excavation, excavation)
        .with(QuantityKey::Backfill, backfill)
        .with(QuantityKey::Reinforcement, steel)
        .with(QuantityKey::Formwork, formwork)
        .with(QuantityKey::Demolition, demolition_volume(concrete, input.rehabilitation));

    design(quantities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::reinforcement::RatioStatus;

    #[test]
    fn test_reference_box_volumes() {
        let result = calculate(&BoxCulvertInput::default());
        // 1.4 × 1.4 × 6 − 1 × 1 × 6
        assert!((result.get(QuantityKey::Concrete) - 5.76).abs() < 1e-9);
        assert!((result.get(QuantityKey::Excavation) - 28.8).abs() < 1e-9);
        assert!((result.get(QuantityKey::Backfill) - 11.52).abs() < 1e-9);
        assert!((result.get(QuantityKey::Formwork) - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_reference_box_steel() {
        let result = calculate(&BoxCulvertInput::default());
        // 11.2 m × 41 bars × 1.0419 kg/m × 1.2
        let steel = result.get(QuantityKey::Reinforcement);
        assert!((steel - 574.12).abs() < 0.05, "steel = {}", steel);
    }

    #[test]
    fn test_reference_box_design() {
        let result = calculate(&BoxCulvertInput::default());
        // 0.1 × 37 × 1.2²
        assert!((result.design_moment_knm.unwrap() - 5.328).abs() < 1e-9);
        assert!((result.recommended_thickness_cm.unwrap() - 15.0).abs() < 1e-9);

        let check = result.reinforcement_check.unwrap();
        assert_eq!(check.max, 0.025);
        assert!((check.min - 0.0035).abs() < 1e-12);
        // (1000 / 15) × 132.73 × 2 / (1000 × 153.5)
        assert!((check.actual - 0.11530).abs() < 1e-4);
        assert_eq!(check.status, RatioStatus::OverReinforced);
    }

    #[test]
    fn test_wide_box_recommends_thicker_slab() {
        let result = calculate(&BoxCulvertInput {
            width_m: 3.0,
            ..BoxCulvertInput::default()
        });
        // (3.0 + 0.2) / 12 × 100 = 26.7 cm
        assert!((result.recommended_thickness_cm.unwrap() - 26.667).abs() < 1e-3);
    }

    #[test]
    fn test_heavy_bars_over_reinforced() {
        let result = calculate(&BoxCulvertInput {
            bar_diameter_mm: 25.0,
            bar_spacing_cm: 7.5,
            ..BoxCulvertInput::default()
        });
        assert_eq!(result.reinforcement_check.unwrap().status, RatioStatus::OverReinforced);
    }

    #[test]
    fn test_rehabilitation_demolition() {
        let result = calculate(&BoxCulvertInput {
            rehabilitation: true,
            ..BoxCulvertInput::default()
        });
        assert_eq!(result.get(QuantityKey::Demolition), result.get(QuantityKey::Concrete));
    }

    #[test]
    fn test_degenerate_returns_no_data() {
        for input in [
            BoxCulvertInput { width_m: 0.0, ..BoxCulvertInput::default() },
            BoxCulvertInput { height_m: -0.5, ..BoxCulvertInput::default() },
        ] {
            let result = calculate(&input);
            assert!(result.is_no_data());
            assert!(result.reinforcement_check.is_none());
            assert!(QuantityKey::ALL.iter().all(|k| result.get(*k) <= 0.0));
        }
    }

    #[test]
    fn test_zero_length_keeps_design_check() {
        let result = calculate(&BoxCulvertInput {
            length_m: 0.0,
            rehabilitation: true,
            ..BoxCulvertInput::default()
        });
        assert!(!result.is_no_data());
        assert!((result.design_moment_knm.unwrap() - 5.328).abs() < 1e-9);
        assert_eq!(result.reinforcement_check.unwrap().status, RatioStatus::OverReinforced);
        assert!(QuantityKey::ALL.iter().all(|k| result.get(*k) == 0.0));
    }
}
