//! # Stone Masonry Channel
//!
//! Quantities for a trapezoidal channel built of mortared river stone: two
//! trapezoidal side walls on a masonry floor, plastered on the wetted face and
//! pointed along the wall tops.
//!
//! Excavation is taken as 1.25 × the masonry volume and backfill as 35% of the
//! difference. The nominal base width enters the floor volume and plaster
//! area only.

use serde::{Deserialize, Serialize};

use super::quantities::{demolition_volume, QuantityKey, QuantityResult, Quantities};
use crate::equations::{slant_length, trapezoid_area};

/// Excavation volume per unit masonry volume
pub const EXCAVATION_FACTOR: f64 = 1.25;

/// Share of the surplus excavation that is backfilled
pub const BACKFILL_FACTOR: f64 = 0.35;

/// Input for a stone masonry channel.
///
/// ## JSON Example
///
/// ```json
/// {
///   "height_m": 0.8,
///   "base_width_m": 0.5,
///   "side_slope": 0.2,
///   "length_m": 50.0,
///   "top_width_m": 0.3,
///   "bottom_width_m": 0.4,
///   "floor_thickness_m": 0.2,
///   "rehabilitation": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasonryChannelInput {
    /// Wall height H (m)
    pub height_m: f64,

    /// Channel floor width B (m)
    pub base_width_m: f64,

    /// Inner face slope 1:m
    pub side_slope: f64,

    /// Channel length (m)
    pub length_m: f64,

    /// Wall crest width (m)
    pub top_width_m: f64,

    /// Wall footing width (m)
    pub bottom_width_m: f64,

    /// Floor slab thickness (m)
    pub floor_thickness_m: f64,

    #[serde(default)]
    pub rehabilitation: bool,
}

impl Default for MasonryChannelInput {
    fn default() -> Self {
        MasonryChannelInput {
            height_m: 0.8,
            base_width_m: 0.5,
            side_slope: 0.2,
            length_m: 50.0,
            top_width_m: 0.3,
            bottom_width_m: 0.4,
            floor_thickness_m: 0.2,
            rehabilitation: false,
        }
    }
}

impl MasonryChannelInput {
    pub fn is_degenerate(&self) -> bool {
        self.height_m <= 0.0 || self.length_m <= 0.0
    }

    /// Masonry cross-section: two walls plus the floor (m²)
    pub fn section_area_m2(&self) -> f64 {
        trapezoid_area(self.top_width_m, self.bottom_width_m, self.height_m) * 2.0
            + self.base_width_m * self.floor_thickness_m
    }
}

/// Compute masonry, earthwork and finishing quantities.
pub fn calculate(input: &MasonryChannelInput) -> QuantityResult {
    if input.is_degenerate() {
        tracing::warn!(
            height_m = input.height_m,
            length_m = input.length_m,
            "masonry channel has no positive height/length, returning no data"
        );
        return QuantityResult::no_data();
    }

    let l = input.length_m;
    let masonry = input.section_area_m2() * l;
    let excavation = masonry * EXCAVATION_FACTOR;
    let backfill = ((excavation - masonry) * BACKFILL_FACTOR).max(0.0);

    let plaster = (2.0 * slant_length(input.height_m, input.side_slope) + input.base_width_m) * l;
    let pointing = 2.0 * input.top_width_m * l;

    let quantities = Quantities::new()
        .with(QuantityKey::Masonry, masonry)
        .with(QuantityKey::Excavation, excavation)
        .with(QuantityKey::Backfill, backfill)
        .with(QuantityKey::Plaster, plaster)
        .with(QuantityKey::Pointing, pointing)
        .with(QuantityKey::Demolition, demolition_volume(masonry, input.rehabilitation));

    QuantityResult::computed(quantities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_section() {
        let result = calculate(&MasonryChannelInput::default());
        // ((0.3 + 0.4)/2 × 0.8 × 2 + 0.5 × 0.2) × 50 = (0.56 + 0.1) × 50
        assert!((result.get(QuantityKey::Masonry) - 33.0).abs() < 1e-9);
        assert!((result.get(QuantityKey::Excavation) - 41.25).abs() < 1e-9);
        // (41.25 − 33) × 0.35
        assert!((result.get(QuantityKey::Backfill) - 2.8875).abs() < 1e-9);
        // 2 × 0.3 × 50
        assert!((result.get(QuantityKey::Pointing) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_plaster_uses_slant_height() {
        let result = calculate(&MasonryChannelInput::default());
        let expected = (2.0 * 0.8 * (1.0f64 + 0.04).sqrt() + 0.5) * 50.0;
        assert!((result.get(QuantityKey::Plaster) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_no_concrete_or_steel() {
        let result = calculate(&MasonryChannelInput::default());
        assert_eq!(result.get(QuantityKey::Concrete), 0.0);
        assert_eq!(result.get(QuantityKey::Reinforcement), 0.0);
        assert!(result.reinforcement_check.is_none());
    }

    #[test]
    fn test_rehabilitation_demolishes_masonry_volume() {
        let plain = calculate(&MasonryChannelInput::default());
        assert_eq!(plain.get(QuantityKey::Demolition), 0.0);

        let rehab = calculate(&MasonryChannelInput {
            rehabilitation: true,
            ..MasonryChannelInput::default()
        });
        assert_eq!(rehab.get(QuantityKey::Demolition), rehab.get(QuantityKey::Masonry));
    }

    #[test]
    fn test_degenerate_returns_no_data() {
        let result = calculate(&MasonryChannelInput {
            height_m: 0.0,
            ..MasonryChannelInput::default()
        });
        assert!(result.is_no_data());
        assert_eq!(result.get(QuantityKey::Masonry), 0.0);
    }
}
