//! # Unit-Price Analysis Recipes (AHSP)
//!
//! Each work item in the water-resources catalog has a recipe: the labour
//! man-days and material quantities needed for one unit of output. Multiplying
//! the recipe through a [`PriceCatalog`] and inflating by overhead-and-profit
//! gives the unit price used on the bill of quantities.
//!
//! The recipe table is compiled in and built once on first use. Unknown codes
//! are not an error: [`get_recipe`] returns a placeholder with no resources,
//! and callers treat an empty resource list as "not found".
//!
//! ## Example
//!
//! ```rust
//! use calc_core::pricing::{get_recipe, unit_price, PriceCatalog};
//!
//! let prices = PriceCatalog::default();
//! let concrete = get_recipe("B.05.a", &prices);
//! assert_eq!(concrete.items.len(), 6);
//!
//! let base = unit_price("B.05.a", &prices, 0.0);
//! let with_overhead = unit_price("B.05.a", &prices, 15.0);
//! assert!((with_overhead - base * 1.15).abs() < 1e-6);
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::catalog::{PriceCatalog, PriceKey};

/// Code reported by the placeholder recipe for unknown lookups
pub const NOT_FOUND_CODE: &str = "N/A";

/// Whether a resource line is labour or material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceClass {
    Labor,
    Material,
}

/// Where a recipe line gets its price from
#[derive(Debug, Clone, Copy, PartialEq)]
enum PriceSource {
    /// A price from the regional catalog
    Catalog(PriceKey),
    /// A fixed price not carried in the catalog (formwork oil)
    Fixed { price: f64, unit: &'static str },
}

#[derive(Debug)]
struct LineTemplate {
    name: &'static str,
    coefficient: f64,
    source: PriceSource,
}

#[derive(Debug)]
struct RecipeTemplate {
    /// Lookup key
    code: &'static str,
    /// Code as printed on the analysis form (may carry a qualifier)
    display_code: &'static str,
    description: &'static str,
    unit: &'static str,
    lines: &'static [LineTemplate],
}

const fn catalog(name: &'static str, coefficient: f64, key: PriceKey) -> LineTemplate {
    LineTemplate {
        name,
        coefficient,
        source: PriceSource::Catalog(key),
    }
}

// ============================================================================
// Recipe Table (SE Menteri PUPR, water-resources works)
// ============================================================================

static RECIPES: [RecipeTemplate; 9] = [
    // --- Earthworks ---
    RecipeTemplate {
        code: "T.06.a.1",
        display_code: "T.06.a.1",
        description: "1 m3 Common excavation (manual)",
        unit: "m3",
        lines: &[
            catalog("Laborer", 0.750, PriceKey::Laborer),
            catalog("Foreman", 0.025, PriceKey::Foreman),
        ],
    },
    RecipeTemplate {
        code: "T.14.a",
        display_code: "T.14.a",
        description: "1 m3 Compacted backfill",
        unit: "m3",
        lines: &[
            catalog("Laborer", 0.330, PriceKey::Laborer),
            catalog("Foreman", 0.010, PriceKey::Foreman),
        ],
    },
    RecipeTemplate {
        code: "T.15.a",
        display_code: "T.15.a",
        description: "1 m3 Demolition of existing masonry",
        unit: "m3",
        lines: &[
            catalog("Laborer", 2.000, PriceKey::Laborer),
            catalog("Foreman", 0.100, PriceKey::Foreman),
        ],
    },
    // --- Masonry ---
    RecipeTemplate {
        code: "P.01.a",
        display_code: "P.01.a (SDA)",
        description: "1 m3 Stone masonry, mortar 1:4",
        unit: "m3",
        lines: &[
            catalog("Laborer", 1.200, PriceKey::Laborer),
            catalog("Mason", 0.600, PriceKey::Mason),
            catalog("Foreman", 0.060, PriceKey::Foreman),
            catalog("River stone", 1.200, PriceKey::Stone),
            catalog("Portland cement", 163.0, PriceKey::Cement),
            catalog("Masonry sand", 0.520, PriceKey::Sand),
        ],
    },
    RecipeTemplate {
        code: "P.04.e",
        display_code: "P.04.e",
        description: "1 m2 Plaster 1:3 + skim coat",
        unit: "m2",
        lines: &[
            catalog("Laborer", 0.300, PriceKey::Laborer),
            catalog("Mason", 0.150, PriceKey::Mason),
            catalog("Foreman", 0.015, PriceKey::Foreman),
            catalog("Portland cement", 7.776, PriceKey::Cement),
            catalog("Masonry sand", 0.024, PriceKey::Sand),
        ],
    },
    RecipeTemplate {
        code: "P.05.a",
        display_code: "P.05.a",
        description: "1 m2 Joint pointing 1:2",
        unit: "m2",
        lines: &[
            catalog("Laborer", 0.150, PriceKey::Laborer),
            catalog("Mason", 0.075, PriceKey::Mason),
            catalog("Foreman", 0.008, PriceKey::Foreman),
            catalog("Portland cement", 6.000, PriceKey::Cement),
            catalog("Masonry sand", 0.010, PriceKey::Sand),
        ],
    },
    // --- Concrete ---
    RecipeTemplate {
        code: "B.05.a",
        display_code: "B.05.a",
        description: "1 m3 Concrete K-225 (f'c 19.3 MPa)",
        unit: "m3",
        lines: &[
            catalog("Laborer", 1.650, PriceKey::Laborer),
            catalog("Mason", 0.275, PriceKey::Mason),
            catalog("Foreman", 0.083, PriceKey::Foreman),
            catalog("Portland cement", 371.0, PriceKey::Cement),
            catalog("Concrete sand", 0.499, PriceKey::Sand),
            catalog("Gravel / split", 0.776, PriceKey::Gravel),
        ],
    },
    RecipeTemplate {
        code: "B.17.a",
        display_code: "B.17.a",
        description: "1 kg Reinforcement, plain/deformed bar",
        unit: "kg",
        lines: &[
            catalog("Laborer", 0.007, PriceKey::Laborer),
            catalog("Steel fixer", 0.007, PriceKey::Mason),
            catalog("Foreman", 0.0004, PriceKey::Foreman),
            // 5% cutting waste
            catalog("Reinforcing steel", 1.050, PriceKey::Rebar),
            catalog("Tie wire", 0.015, PriceKey::TieWire),
        ],
    },
    RecipeTemplate {
        code: "B.20.a",
        display_code: "B.20.a",
        description: "1 m2 Timber formwork (class III, 2 uses)",
        unit: "m2",
        lines: &[
            catalog("Laborer", 0.520, PriceKey::Laborer),
            catalog("Carpenter", 0.260, PriceKey::Mason),
            catalog("Foreman", 0.026, PriceKey::Foreman),
            catalog("Class III timber", 0.045, PriceKey::Timber),
            catalog("Nails", 0.300, PriceKey::Nails),
            LineTemplate {
                name: "Formwork oil",
                coefficient: 0.100,
                source: PriceSource::Fixed {
                    price: 25_000.0,
                    unit: "ltr",
                },
            },
        ],
    },
];

static RECIPE_INDEX: Lazy<HashMap<&'static str, &'static RecipeTemplate>> =
    Lazy::new(|| RECIPES.iter().map(|r| (r.code, r)).collect());

// ============================================================================
// Resolved Recipes
// ============================================================================

/// One priced resource line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLine {
    /// Resource name as printed on the analysis form
    pub name: String,
    /// Quantity of resource per unit of output
    pub coefficient: f64,
    /// Resource unit price
    pub unit_price: f64,
    /// Resource unit (OH, kg, m3, ltr)
    pub unit: String,
    pub class: ResourceClass,
}

impl ResourceLine {
    /// coefficient × unit price
    pub fn amount(&self) -> f64 {
        self.coefficient * self.unit_price
    }
}

/// A work-item recipe with prices filled in from a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub code: String,
    pub description: String,
    /// Unit of output (m3, m2, kg); empty for the placeholder
    pub unit: String,
    pub items: Vec<ResourceLine>,
}

impl Recipe {
    fn not_found() -> Self {
        Recipe {
            code: NOT_FOUND_CODE.to_string(),
            description: "Item not found".to_string(),
            unit: String::new(),
            items: Vec::new(),
        }
    }

    /// False for the placeholder returned on unknown codes
    pub fn is_found(&self) -> bool {
        !self.items.is_empty()
    }

    /// Coefficient-weighted sum of resource prices, before overhead
    pub fn base_cost(&self) -> f64 {
        self.items.iter().map(ResourceLine::amount).sum()
    }
}

/// Codes of all compiled-in recipes, in catalog order.
pub fn recipe_codes() -> Vec<&'static str> {
    let order = [
        "T.06.a.1", "T.14.a", "T.15.a", "P.01.a", "P.04.e", "P.05.a", "B.05.a", "B.17.a", "B.20.a",
    ];
    order
        .into_iter()
        .filter(|code| RECIPE_INDEX.contains_key(code))
        .collect()
}

/// Resolve a recipe against a price catalog.
///
/// Unknown codes yield a placeholder recipe with no resources.
pub fn get_recipe(code: &str, prices: &PriceCatalog) -> Recipe {
    let Some(template) = RECIPE_INDEX.get(code) else {
        tracing::debug!(code, "work item not in recipe table");
        return Recipe::not_found();
    };

    let items = template
        .lines
        .iter()
        .map(|line| {
            let (unit_price, unit, class) = match line.source {
                PriceSource::Catalog(key) => {
                    let class = if key.is_labor() {
                        ResourceClass::Labor
                    } else {
                        ResourceClass::Material
                    };
                    (prices.get(key), key.unit(), class)
                }
                PriceSource::Fixed { price, unit } => (price, unit, ResourceClass::Material),
            };
            ResourceLine {
                name: line.name.to_string(),
                coefficient: line.coefficient,
                unit_price,
                unit: unit.to_string(),
                class,
            }
        })
        .collect();

    Recipe {
        code: template.display_code.to_string(),
        description: template.description.to_string(),
        unit: template.unit.to_string(),
        items,
    }
}

/// Final unit price: `Σ(coefficient × price) × (1 + overhead_pct/100)`.
///
/// No rounding is applied. Unknown codes price at zero.
pub fn unit_price(code: &str, prices: &PriceCatalog, overhead_pct: f64) -> f64 {
    get_recipe(code, prices).base_cost() * (1.0 + overhead_pct / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codes_resolve() {
        let prices = PriceCatalog::default();
        let codes = recipe_codes();
        assert_eq!(codes.len(), 9);
        for code in codes {
            let recipe = get_recipe(code, &prices);
            assert!(recipe.is_found(), "{} should resolve", code);
            assert!(recipe.base_cost() > 0.0);
        }
    }

    #[test]
    fn test_unknown_code_is_placeholder() {
        let recipe = get_recipe("Z.99", &PriceCatalog::default());
        assert!(!recipe.is_found());
        assert_eq!(recipe.code, NOT_FOUND_CODE);
        assert_eq!(recipe.description, "Item not found");
        assert_eq!(unit_price("Z.99", &PriceCatalog::default(), 15.0), 0.0);
    }

    #[test]
    fn test_excavation_unit_price() {
        let prices = PriceCatalog::default();
        // 0.75 × 115000 + 0.025 × 165000 = 86250 + 4125 = 90375
        let base = unit_price("T.06.a.1", &prices, 0.0);
        assert!((base - 90_375.0).abs() < 1e-6);
        // +15% overhead
        let final_price = unit_price("T.06.a.1", &prices, 15.0);
        assert!((final_price - 103_931.25).abs() < 1e-6);
    }

    #[test]
    fn test_zero_overhead_equals_base_cost() {
        let prices = PriceCatalog::default();
        for code in recipe_codes() {
            let base = get_recipe(code, &prices).base_cost();
            assert_eq!(unit_price(code, &prices, 0.0), base);
        }
    }

    #[test]
    fn test_unit_price_monotonic_in_overhead() {
        let prices = PriceCatalog::default();
        let mut last = unit_price("B.05.a", &prices, 0.0);
        for step in 1..=30 {
            let next = unit_price("B.05.a", &prices, step as f64);
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn test_formwork_oil_uses_fixed_price() {
        let prices = PriceCatalog::default();
        let formwork = get_recipe("B.20.a", &prices);
        let oil = formwork.items.iter().find(|l| l.name == "Formwork oil").unwrap();
        assert_eq!(oil.unit_price, 25_000.0);
        assert_eq!(oil.unit, "ltr");
        assert_eq!(oil.class, ResourceClass::Material);
    }

    #[test]
    fn test_masonry_display_code_has_qualifier() {
        let recipe = get_recipe("P.01.a", &PriceCatalog::default());
        assert_eq!(recipe.code, "P.01.a (SDA)");
    }

    #[test]
    fn test_prices_flow_into_recipe() {
        let cheap = PriceCatalog::default();
        let dear = cheap.with(PriceKey::Cement, cheap.cement * 2.0);
        assert!(unit_price("B.05.a", &dear, 0.0) > unit_price("B.05.a", &cheap, 0.0));
        // Earthworks use no cement
        assert_eq!(unit_price("T.14.a", &dear, 0.0), unit_price("T.14.a", &cheap, 0.0));
    }
}
