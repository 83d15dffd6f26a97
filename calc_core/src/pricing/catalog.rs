//! Regional Price Catalog
//!
//! The flat set of basic prices every unit-price analysis draws on: three
//! labour day-rates and eight material prices. The catalog has no identity of
//! its own; it is just the current values, read from configuration or typed
//! in by the estimator.

use serde::{Deserialize, Serialize};

/// Names of the basic prices in the catalog.
///
/// Recipes refer to prices through these keys so that the recipe table can
/// be built once, independently of any particular price set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceKey {
    /// Pekerja - general laborer (per man-day)
    Laborer,
    /// Tukang - skilled mason / carpenter / steel fixer (per man-day)
    Mason,
    /// Mandor - foreman (per man-day)
    Foreman,
    /// Portland cement (per kg)
    Cement,
    /// Masonry / concrete sand (per m³)
    Sand,
    /// River stone (per m³)
    Stone,
    /// Crushed gravel / split (per m³)
    Gravel,
    /// Reinforcing steel (per kg)
    Rebar,
    /// Tie wire (per kg)
    TieWire,
    /// Class III timber (per m³)
    Timber,
    /// Nails (per kg)
    Nails,
}

impl PriceKey {
    /// All catalog keys, labour first
    pub const ALL: [PriceKey; 11] = [
        PriceKey::Laborer,
        PriceKey::Mason,
        PriceKey::Foreman,
        PriceKey::Cement,
        PriceKey::Sand,
        PriceKey::Stone,
        PriceKey::Gravel,
        PriceKey::Rebar,
        PriceKey::TieWire,
        PriceKey::Timber,
        PriceKey::Nails,
    ];

    /// Whether this key is a labour rate (as opposed to a material price)
    pub fn is_labor(&self) -> bool {
        matches!(self, PriceKey::Laborer | PriceKey::Mason | PriceKey::Foreman)
    }

    /// Unit the price is quoted per
    pub fn unit(&self) -> &'static str {
        match self {
            PriceKey::Laborer | PriceKey::Mason | PriceKey::Foreman => "OH",
            PriceKey::Cement | PriceKey::Rebar | PriceKey::TieWire | PriceKey::Nails => "kg",
            PriceKey::Sand | PriceKey::Stone | PriceKey::Gravel | PriceKey::Timber => "m3",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            PriceKey::Laborer => "Laborer",
            PriceKey::Mason => "Mason / Carpenter",
            PriceKey::Foreman => "Foreman",
            PriceKey::Cement => "Portland cement",
            PriceKey::Sand => "Sand",
            PriceKey::Stone => "River stone",
            PriceKey::Gravel => "Gravel / split",
            PriceKey::Rebar => "Reinforcing steel",
            PriceKey::TieWire => "Tie wire",
            PriceKey::Timber => "Class III timber",
            PriceKey::Nails => "Nails",
        }
    }
}

/// Basic labour and material prices, in currency per unit.
///
/// ## TOML Example
///
/// ```toml
/// laborer = 115000.0
/// mason = 140000.0
/// foreman = 165000.0
/// cement = 1650.0
/// sand = 215000.0
/// stone = 265000.0
/// gravel = 325000.0
/// rebar = 15500.0
/// tie_wire = 22000.0
/// timber = 2850000.0
/// nails = 20000.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceCatalog {
    pub laborer: f64,
    pub mason: f64,
    pub foreman: f64,
    pub cement: f64,
    pub sand: f64,
    pub stone: f64,
    pub gravel: f64,
    pub rebar: f64,
    pub tie_wire: f64,
    pub timber: f64,
    pub nails: f64,
}

impl PriceCatalog {
    /// Look up a single basic price
    pub fn get(&self, key: PriceKey) -> f64 {
        match key {
            PriceKey::Laborer => self.laborer,
            PriceKey::Mason => self.mason,
            PriceKey::Foreman => self.foreman,
            PriceKey::Cement => self.cement,
            PriceKey::Sand => self.sand,
            PriceKey::Stone => self.stone,
            PriceKey::Gravel => self.gravel,
            PriceKey::Rebar => self.rebar,
            PriceKey::TieWire => self.tie_wire,
            PriceKey::Timber => self.timber,
            PriceKey::Nails => self.nails,
        }
    }

    /// Builder-style override of a single price
    pub fn with(mut self, key: PriceKey, value: f64) -> Self {
        let slot = match key {
            PriceKey::Laborer => &mut self.laborer,
            PriceKey::Mason => &mut self.mason,
            PriceKey::Foreman => &mut self.foreman,
            PriceKey::Cement => &mut self.cement,
            PriceKey::Sand => &mut self.sand,
            PriceKey::Stone => &mut self.stone,
            PriceKey::Gravel => &mut self.gravel,
            PriceKey::Rebar => &mut self.rebar,
            PriceKey::TieWire => &mut self.tie_wire,
            PriceKey::Timber => &mut self.timber,
            PriceKey::Nails => &mut self.nails,
        };
        *slot = value;
        self
    }
}

impl Default for PriceCatalog {
    /// Bengkulu province market estimate, 2024/2025.
    fn default() -> Self {
        PriceCatalog {
            laborer: 115_000.0,
            mason: 140_000.0,
            foreman: 165_000.0,
            cement: 1_650.0,
            sand: 215_000.0,
            stone: 265_000.0,
            gravel: 325_000.0,
            rebar: 15_500.0,
            tie_wire: 22_000.0,
            timber: 2_850_000.0,
            nails: 20_000.0,
        }
    }
}
