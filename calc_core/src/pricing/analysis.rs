//! Unit-price analysis form and price schedule.
//!
//! [`price_analysis`] lays a recipe out the way the standard analysis form
//! does: labour subtotal (A), material subtotal (B), their sum (C), overhead
//! (D) and the final unit price (E). [`UnitPriceSchedule`] prices every
//! catalog item once for use on a bill of quantities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ahsp::{get_recipe, recipe_codes, Recipe, ResourceClass, ResourceLine};
use super::catalog::PriceCatalog;

/// One row of the analysis form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub name: String,
    pub coefficient: f64,
    pub unit: String,
    pub unit_price: f64,
    pub amount: f64,
    pub class: ResourceClass,
}

impl From<&ResourceLine> for AnalysisRow {
    fn from(line: &ResourceLine) -> Self {
        AnalysisRow {
            name: line.name.clone(),
            coefficient: line.coefficient,
            unit: line.unit.clone(),
            unit_price: line.unit_price,
            amount: line.amount(),
            class: line.class,
        }
    }
}

/// Full unit-price analysis of one work item.
///
/// ## JSON Example
///
/// ```json
/// {
///   "code": "T.06.a.1",
///   "description": "1 m3 Common excavation (manual)",
///   "unit": "m3",
///   "rows": [ ... ],
///   "labor_total": 90375.0,
///   "material_total": 0.0,
///   "base_total": 90375.0,
///   "overhead_pct": 15.0,
///   "overhead_value": 13556.25,
///   "unit_price": 103931.25
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAnalysis {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub rows: Vec<AnalysisRow>,
    /// A. Labour
    pub labor_total: f64,
    /// B. Materials
    pub material_total: f64,
    /// C. A + B
    pub base_total: f64,
    pub overhead_pct: f64,
    /// D. C × overhead
    pub overhead_value: f64,
    /// E. C + D
    pub unit_price: f64,
}

impl PriceAnalysis {
    /// False when the code was not in the recipe table
    pub fn is_found(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// Build the analysis form for a work item.
///
/// The final price equals [`super::unit_price`] for the same arguments.
pub fn price_analysis(code: &str, prices: &PriceCatalog, overhead_pct: f64) -> PriceAnalysis {
    let recipe: Recipe = get_recipe(code, prices);
    let rows: Vec<AnalysisRow> = recipe.items.iter().map(AnalysisRow::from).collect();

    let labor_total: f64 = rows
        .iter()
        .filter(|r| r.class == ResourceClass::Labor)
        .map(|r| r.amount)
        .sum();
    let material_total: f64 = rows
        .iter()
        .filter(|r| r.class == ResourceClass::Material)
        .map(|r| r.amount)
        .sum();
    let base_total = labor_total + material_total;
    let overhead_value = base_total * (overhead_pct / 100.0);

    PriceAnalysis {
        code: recipe.code,
        description: recipe.description,
        unit: recipe.unit,
        rows,
        labor_total,
        material_total,
        base_total,
        overhead_pct,
        overhead_value,
        unit_price: base_total + overhead_value,
    }
}

/// Priced entry of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub unit_price: f64,
}

/// Unit prices for every catalog work item, evaluated once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitPriceSchedule {
    pub overhead_pct: f64,
    /// Keyed by lookup code (e.g. "P.01.a", not the qualified display code)
    pub entries: BTreeMap<String, ScheduleEntry>,
}

impl UnitPriceSchedule {
    /// Price all recipes against a catalog and overhead.
    pub fn new(prices: &PriceCatalog, overhead_pct: f64) -> Self {
        let entries = recipe_codes()
            .into_iter()
            .map(|code| {
                let analysis = price_analysis(code, prices, overhead_pct);
                let entry = ScheduleEntry {
                    code: analysis.code,
                    description: analysis.description,
                    unit: analysis.unit,
                    unit_price: analysis.unit_price,
                };
                (code.to_string(), entry)
            })
            .collect();
        UnitPriceSchedule {
            overhead_pct,
            entries,
        }
    }

    /// Unit price for a lookup code, if it is in the catalog
    pub fn price(&self, code: &str) -> Option<f64> {
        self.entries.get(code).map(|e| e.unit_price)
    }

    /// Entries in catalog order
    pub fn ordered(&self) -> Vec<(&'static str, &ScheduleEntry)> {
        recipe_codes()
            .into_iter()
            .filter_map(|code| self.entries.get(code).map(|e| (code, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::unit_price;

    #[test]
    fn test_analysis_matches_unit_price() {
        let prices = PriceCatalog::default();
        for code in recipe_codes() {
            let analysis = price_analysis(code, &prices, 15.0);
            let direct = unit_price(code, &prices, 15.0);
            assert!((analysis.unit_price - direct).abs() < 1e-6, "{}", code);
        }
    }

    #[test]
    fn test_labor_material_split() {
        let prices = PriceCatalog::default();
        let analysis = price_analysis("B.17.a", &prices, 10.0);
        // Labour: 0.007 × 115000 + 0.007 × 140000 + 0.0004 × 165000 = 805 + 980 + 66
        assert!((analysis.labor_total - 1_851.0).abs() < 1e-6);
        // Material: 1.05 × 15500 + 0.015 × 22000 = 16275 + 330
        assert!((analysis.material_total - 16_605.0).abs() < 1e-6);
        assert!((analysis.overhead_value - 1_845.6).abs() < 1e-6);
    }

    #[test]
    fn test_earthworks_have_no_materials() {
        let analysis = price_analysis("T.15.a", &PriceCatalog::default(), 15.0);
        assert_eq!(analysis.material_total, 0.0);
        assert!(analysis.labor_total > 0.0);
    }

    #[test]
    fn test_unknown_analysis_is_empty() {
        let analysis = price_analysis("nope", &PriceCatalog::default(), 15.0);
        assert!(!analysis.is_found());
        assert_eq!(analysis.unit_price, 0.0);
    }

    #[test]
    fn test_schedule_covers_catalog() {
        let schedule = UnitPriceSchedule::new(&PriceCatalog::default(), 15.0);
        assert_eq!(schedule.entries.len(), 9);
        assert!(schedule.price("P.01.a").is_some());
        assert!(schedule.price("X.1").is_none());
        assert_eq!(schedule.ordered()[0].0, "T.06.a.1");
        assert_eq!(schedule.entries["P.01.a"].code, "P.01.a (SDA)");
    }
}
