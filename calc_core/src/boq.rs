//! # Priced Bill of Quantities
//!
//! Matches every quantity of every line item against its work item, prices it
//! from a [`UnitPriceSchedule`] and totals the bill with tax. A saved project
//! is priced with its own [`ProjectSettings`](crate::project::ProjectSettings)
//! through [`price_project`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::boq::build_boq;
//! use calc_core::calculations::{BoxCulvertInput, StructureInput};
//! use calc_core::pricing::{PriceCatalog, UnitPriceSchedule};
//! use calc_core::project::Project;
//!
//! let mut project = Project::default();
//! project.append("Gorong-gorong 1", StructureInput::BoxCulvert(BoxCulvertInput::default()));
//!
//! let schedule = UnitPriceSchedule::new(&PriceCatalog::default(), 15.0);
//! let bill = build_boq(&project, &schedule, 11.0);
//! assert!((bill.tax - bill.grand_total * 0.11).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::{QuantityKey, StructureKind};
use crate::pricing::{PriceCatalog, UnitPriceSchedule};
use crate::project::Project;

/// Quantities at or below this are left off the bill
pub const MIN_BILLED_QUANTITY: f64 = 0.001;

/// The work item a quantity is priced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    /// Recipe lookup code
    pub code: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
}

/// Fixed quantity-to-work-item mapping.
pub fn work_item(key: QuantityKey) -> WorkItem {
    let (code, description, unit) = match key {
        QuantityKey::Demolition => ("T.15.a", "Demolition of existing masonry", "m3"),
        QuantityKey::Excavation => ("T.06.a.1", "Common excavation", "m3"),
        QuantityKey::Backfill => ("T.14.a", "Compacted backfill", "m3"),
        QuantityKey::Concrete => ("B.05.a", "Structural concrete K-225", "m3"),
        QuantityKey::Masonry => ("P.01.a", "River stone masonry 1:4", "m3"),
        QuantityKey::Reinforcement => ("B.17.a", "Reinforcing steel", "kg"),
        QuantityKey::Formwork => ("B.20.a", "Formwork", "m2"),
        QuantityKey::Plaster => ("P.04.e", "Plaster 1:3 with skim coat", "m2"),
        QuantityKey::Pointing => ("P.05.a", "Pointing 1:2", "m2"),
    };
    WorkItem {
        code,
        description,
        unit,
    }
}

/// One priced row of the bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqRow {
    pub code: String,
    pub description: String,
    pub volume: f64,
    pub unit: String,
    pub unit_price: f64,
    pub amount: f64,
}

/// Rows for one line item of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqSection {
    /// 1-based position in the project
    pub number: usize,
    pub name: String,
    pub kind: StructureKind,
    pub rows: Vec<BoqRow>,
    pub subtotal: f64,
}

/// The priced bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfQuantities {
    pub sections: Vec<BoqSection>,
    pub grand_total: f64,
    pub tax_pct: f64,
    pub tax: f64,
    pub total_with_tax: f64,
}

impl BillOfQuantities {
    /// All rows across sections, in order
    pub fn rows(&self) -> impl Iterator<Item = (&BoqSection, &BoqRow)> {
        self.sections
            .iter()
            .flat_map(|section| section.rows.iter().map(move |row| (section, row)))
    }
}

/// Price every line item of `project`.
///
/// Items whose quantities are all negligible still get an empty section so
/// numbering follows the project list.
pub fn build_boq(project: &Project, schedule: &UnitPriceSchedule, tax_pct: f64) -> BillOfQuantities {
    let sections: Vec<BoqSection> = project
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let rows: Vec<BoqRow> = item
                .result
                .quantities
                .iter()
                .filter(|(_, volume)| *volume > MIN_BILLED_QUANTITY)
                .map(|(key, volume)| {
                    let work = work_item(key);
                    let unit_price = schedule.price(work.code).unwrap_or_else(|| {
                        tracing::warn!(code = work.code, "work item missing from schedule, priced at 0");
                        0.0
                    });
                    BoqRow {
                        code: work.code.to_string(),
                        description: work.description.to_string(),
                        volume,
                        unit: work.unit.to_string(),
                        unit_price,
                        amount: volume * unit_price,
                    }
                })
                .collect();
            let subtotal = rows.iter().map(|r| r.amount).sum();
            BoqSection {
                number: i + 1,
                name: item.name.clone(),
                kind: item.kind,
                rows,
                subtotal,
            }
        })
        .collect();

    let grand_total: f64 = sections.iter().map(|s| s.subtotal).sum();
    let tax = grand_total * tax_pct / 100.0;

    tracing::debug!(sections = sections.len(), grand_total, tax, "bill of quantities");

    BillOfQuantities {
        sections,
        grand_total,
        tax_pct,
        tax,
        total_with_tax: grand_total + tax,
    }
}

/// Price `project` with the overhead and tax stored in its settings.
pub fn price_project(project: &Project, prices: &PriceCatalog) -> BillOfQuantities {
    let settings = &project.settings;
    let schedule = UnitPriceSchedule::new(prices, settings.overhead_pct);
    build_boq(project, &schedule, settings.tax_pct)
}
