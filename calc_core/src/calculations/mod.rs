//! # Structure Calculations
//!
//! One calculator per structure type. Each follows the pattern:
//!
//! - `*Input` - Dimensions and material grades (JSON-serializable)
//! - `calculate(input) -> QuantityResult` - Pure calculation function
//!
//! Calculators never fail. Degenerate dimensions are either clamped to safe
//! minimums or produce an all-zero result with status "no data".
//!
//! ## Available Calculations
//!
//! - [`channel`] - Reinforced concrete rectangular/trapezoidal channel
//! - [`masonry_channel`] - Stone masonry trapezoidal channel
//! - [`box_culvert`] - Reinforced concrete box culvert
//! - [`stepped_drop`] - Stepped drop with USBR stilling basins

pub mod box_culvert;
pub mod channel;
pub mod masonry_channel;
pub mod quantities;
pub mod reinforcement;
pub mod stepped_drop;

use serde::{Deserialize, Serialize};

pub use box_culvert::BoxCulvertInput;
pub use channel::ChannelInput;
pub use masonry_channel::MasonryChannelInput;
pub use quantities::{CalcStatus, QuantityKey, QuantityResult, Quantities};
pub use reinforcement::{RatioStatus, ReinforcementCheck};
pub use stepped_drop::{
    BasinType, BearingStatus, DesignMode, HydraulicJump, StabilityCheck, SteppedDropInput,
    UpliftStatus,
};

/// Dimensions of one structure, tagged by its type.
///
/// ## JSON Example
///
/// ```json
/// { "type": "BoxCulvert", "width_m": 1.0, "height_m": 1.0, "length_m": 6.0,
///   "thickness_cm": 20.0, "bar_diameter_mm": 13.0, "bar_spacing_cm": 15.0,
///   "fc_mpa": 25.0, "fy_mpa": 400.0, "rehabilitation": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StructureInput {
    ReinforcedChannel(ChannelInput),
    MasonryChannel(MasonryChannelInput),
    BoxCulvert(BoxCulvertInput),
    SteppedDrop(SteppedDropInput),
}

impl StructureInput {
    pub fn kind(&self) -> StructureKind {
        match self {
            StructureInput::ReinforcedChannel(_) => StructureKind::ReinforcedChannel,
            StructureInput::MasonryChannel(_) => StructureKind::MasonryChannel,
            StructureInput::BoxCulvert(_) => StructureKind::BoxCulvert,
            StructureInput::SteppedDrop(_) => StructureKind::SteppedDrop,
        }
    }

    /// True when the existing structure is demolished first
    pub fn is_rehabilitation(&self) -> bool {
        match self {
            StructureInput::ReinforcedChannel(i) => i.rehabilitation,
            StructureInput::MasonryChannel(i) => i.rehabilitation,
            StructureInput::BoxCulvert(i) => i.rehabilitation,
            StructureInput::SteppedDrop(i) => i.rehabilitation,
        }
    }

    /// Dispatch to the calculator for this structure type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use calc_core::calculations::{ChannelInput, QuantityKey, StructureInput};
    ///
    /// let input = StructureInput::ReinforcedChannel(ChannelInput::default());
    /// let result = input.compute();
    /// assert!(result.get(QuantityKey::Excavation) > result.get(QuantityKey::Concrete));
    /// ```
    pub fn compute(&self) -> QuantityResult {
        match self {
            StructureInput::ReinforcedChannel(i) => channel::calculate(i),
            StructureInput::MasonryChannel(i) => masonry_channel::calculate(i),
            StructureInput::BoxCulvert(i) => box_culvert::calculate(i),
            StructureInput::SteppedDrop(i) => stepped_drop::calculate(i),
        }
    }
}

/// Structure type without its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    ReinforcedChannel,
    MasonryChannel,
    BoxCulvert,
    SteppedDrop,
}

impl StructureKind {
    pub fn label(&self) -> &'static str {
        match self {
            StructureKind::ReinforcedChannel => "Reinforced concrete channel",
            StructureKind::MasonryChannel => "Stone masonry channel",
            StructureKind::BoxCulvert => "Box culvert",
            StructureKind::SteppedDrop => "Stepped drop (USBR)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants(rehabilitation: bool) -> Vec<StructureInput> {
        vec![
            StructureInput::ReinforcedChannel(ChannelInput {
                rehabilitation,
                ..ChannelInput::default()
            }),
            StructureInput::MasonryChannel(MasonryChannelInput {
                rehabilitation,
                ..MasonryChannelInput::default()
            }),
            StructureInput::BoxCulvert(BoxCulvertInput {
                rehabilitation,
                ..BoxCulvertInput::default()
            }),
            StructureInput::SteppedDrop(SteppedDropInput {
                rehabilitation,
                ..SteppedDropInput::default()
            }),
        ]
    }

    /// Volume that is demolished: masonry for the masonry channel, concrete otherwise
    fn structural_volume(input: &StructureInput, result: &QuantityResult) -> f64 {
        match input.kind() {
            StructureKind::MasonryChannel => result.get(QuantityKey::Masonry),
            _ => result.get(QuantityKey::Concrete),
        }
    }

    #[test]
    fn test_demolition_matches_rehabilitation_flag() {
        for input in all_variants(false) {
            assert_eq!(input.compute().get(QuantityKey::Demolition), 0.0, "{:?}", input.kind());
        }
        for input in all_variants(true) {
            let result = input.compute();
            assert!(input.is_rehabilitation());
            assert_eq!(
                result.get(QuantityKey::Demolition),
                structural_volume(&input, &result),
                "{:?}",
                input.kind()
            );
        }
    }

    #[test]
    fn test_all_quantities_non_negative() {
        for input in all_variants(true) {
            let result = input.compute();
            for (key, value) in result.quantities.iter() {
                assert!(value >= 0.0, "{:?} {:?} = {}", input.kind(), key, value);
            }
        }
    }

    #[test]
    fn test_tagged_serialization() {
        let input = StructureInput::BoxCulvert(BoxCulvertInput::default());
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains(r#""type":"BoxCulvert""#));

        let back: StructureInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
        assert_eq!(back.kind(), StructureKind::BoxCulvert);
    }

    #[test]
    fn test_rehabilitation_defaults_to_false() {
        let json = r#"{"type":"MasonryChannel","height_m":1.0,"base_width_m":0.5,
            "side_slope":0.0,"length_m":10.0,"top_width_m":0.3,"bottom_width_m":0.5,
            "floor_thickness_m":0.2}"#;
        let input: StructureInput = serde_json::from_str(json).unwrap();
        assert!(!input.is_rehabilitation());
    }
}
