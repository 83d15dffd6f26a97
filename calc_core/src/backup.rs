//! # Volume Back-up Sheet
//!
//! Explains where each billed quantity came from: the formula used and the
//! same formula with the item's numbers substituted. Items saved without
//! their dimensions get a generic description instead.

use serde::{Deserialize, Serialize};

use crate::boq::{work_item, MIN_BILLED_QUANTITY};
use crate::calculations::{
    box_culvert, channel, masonry_channel, stepped_drop, BoxCulvertInput, ChannelInput,
    MasonryChannelInput, QuantityKey, QuantityResult, StructureInput,
};
use crate::equations::{bar_count, bar_unit_weight, slant_length};
use crate::project::{LineItem, Project};

/// One derived quantity with its working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRow {
    pub code: String,
    pub description: String,
    /// Symbolic formula, e.g. `((Lb + La)/2) x H x P`
    pub formula: String,
    /// Formula with numbers substituted
    pub calculation: String,
    pub volume: f64,
    pub unit: String,
}

/// Back-up rows for one line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSection {
    pub number: usize,
    pub name: String,
    pub rows: Vec<BackupRow>,
}

/// Back-up sections for every line item, in project order.
pub fn build_backup(project: &Project) -> Vec<BackupSection> {
    project
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| BackupSection {
            number: i + 1,
            name: item.name.clone(),
            rows: explain(item),
        })
        .collect()
}

/// Working for each billed quantity of one item.
pub fn explain(item: &LineItem) -> Vec<BackupRow> {
    item.result
        .quantities
        .iter()
        .filter(|(_, volume)| *volume > MIN_BILLED_QUANTITY)
        .map(|(key, volume)| {
            let (formula, calculation) = match &item.dimensions {
                Some(input) => derivation(key, input, &item.result),
                None => generic(key, &item.result),
            };
            let work = work_item(key);
            BackupRow {
                code: work.code.to_string(),
                description: work.description.to_string(),
                formula,
                calculation,
                volume,
                unit: work.unit.to_string(),
            }
        })
        .collect()
}

/// Description used when dimensions were not stored
fn generic(key: QuantityKey, result: &QuantityResult) -> (String, String) {
    match key {
        QuantityKey::Reinforcement => steel_by_ratio(result),
        QuantityKey::Formwork | QuantityKey::Plaster | QuantityKey::Pointing => {
            ("Wetted face area".to_string(), "-".to_string())
        }
        _ => (
            "Cross-section area x length".to_string(),
            "Per cross-section profile".to_string(),
        ),
    }
}

fn steel_by_ratio(result: &QuantityResult) -> (String, String) {
    let concrete = result.get(QuantityKey::Concrete);
    let calculation = if concrete > 0.0 {
        let ratio = result.get(QuantityKey::Reinforcement) / concrete;
        format!("{:.2} x {:.0}", concrete, ratio)
    } else {
        "-".to_string()
    };
    ("Vol. concrete x ratio (kg/m3)".to_string(), calculation)
}

fn demolition(result: &QuantityResult, volume_key: QuantityKey) -> (String, String) {
    (
        "Volume of new work (rehabilitation)".to_string(),
        format!("{:.3}", result.get(volume_key)),
    )
}

fn derivation(key: QuantityKey, input: &StructureInput, result: &QuantityResult) -> (String, String) {
    match input {
        StructureInput::ReinforcedChannel(c) => channel_derivation(key, c, result),
        StructureInput::MasonryChannel(m) => masonry_derivation(key, m, result),
        StructureInput::BoxCulvert(b) => culvert_derivation(key, b, result),
        StructureInput::SteppedDrop(_) => drop_derivation(key, result),
    }
}

fn channel_derivation(key: QuantityKey, c: &ChannelInput, result: &QuantityResult) -> (String, String) {
    let s = c.slant_height_m();
    let t = c.thickness_m();
    let p = c.length_m;
    match key {
        QuantityKey::Excavation => {
            let (bottom, top, depth) = c.excavation_section_m();
            (
                "((Lb + La)/2) x H x P".to_string(),
                format!("(({:.2} + {:.2})/2) x {:.2} x {:.2}", bottom, top, depth, p),
            )
        }
        QuantityKey::Concrete => (
            "(B + 2S + 2t) x t x P".to_string(),
            format!("({:.2} + 2x{:.2} + 2x{:.2}) x {:.2} x {:.2}", c.base_width_m, s, t, t, p),
        ),
        QuantityKey::Backfill => (
            format!("(V.excavation - V.concrete) x {}", channel::BACKFILL_FACTOR),
            format!(
                "({:.3} - {:.3}) x {}",
                result.get(QuantityKey::Excavation),
                result.get(QuantityKey::Concrete),
                channel::BACKFILL_FACTOR
            ),
        ),
        QuantityKey::Formwork => (
            "(2 x S) x P x 2 faces".to_string(),
            format!("(2 x {:.2}) x {:.2} x 2", s, p),
        ),
        QuantityKey::Reinforcement => (
            format!(
                "(B + 2S) x n bars x layers x kg/m x {} x (1 + waste)",
                channel::DISTRIBUTION_STEEL_FACTOR
            ),
            format!(
                "({:.2} + 2x{:.2}) x {:.0} x {} x {:.3} x {} x {:.2}",
                c.base_width_m,
                s,
                bar_count(p, c.bar_spacing_cm),
                c.layers,
                bar_unit_weight(c.bar_diameter_mm),
                channel::DISTRIBUTION_STEEL_FACTOR,
                1.0 + c.waste_pct / 100.0
            ),
        ),
        QuantityKey::Demolition => demolition(result, QuantityKey::Concrete),
        _ => generic(key, result),
    }
}

fn masonry_derivation(key: QuantityKey, m: &MasonryChannelInput, result: &QuantityResult) -> (String, String) {
    let p = m.length_m;
    let masonry = result.get(QuantityKey::Masonry);
    match key {
        QuantityKey::Masonry => (
            "(2 x ((a + b)/2) x H + B x tf) x P".to_string(),
            format!(
                "(2 x (({:.2} + {:.2})/2) x {:.2} + {:.2} x {:.2}) x {:.2}",
                m.top_width_m, m.bottom_width_m, m.height_m, m.base_width_m, m.floor_thickness_m, p
            ),
        ),
        QuantityKey::Excavation => (
            format!("V.masonry x {}", masonry_channel::EXCAVATION_FACTOR),
            format!("{:.3} x {}", masonry, masonry_channel::EXCAVATION_FACTOR),
        ),
        QuantityKey::Backfill => (
            format!("(V.excavation - V.masonry) x {}", masonry_channel::BACKFILL_FACTOR),
            format!(
                "({:.3} - {:.3}) x {}",
                result.get(QuantityKey::Excavation),
                masonry,
                masonry_channel::BACKFILL_FACTOR
            ),
        ),
        QuantityKey::Plaster => (
            "(2S + B) x P".to_string(),
            format!(
                "(2x{:.2} + {:.2}) x {:.2}",
                slant_length(m.height_m, m.side_slope),
                m.base_width_m,
                p
            ),
        ),
        QuantityKey::Pointing => (
            "2 x a x P".to_string(),
            format!("2 x {:.2} x {:.2}", m.top_width_m, p),
        ),
        QuantityKey::Demolition => demolition(result, QuantityKey::Masonry),
        _ => generic(key, result),
    }
}

fn culvert_derivation(key: QuantityKey, b: &BoxCulvertInput, result: &QuantityResult) -> (String, String) {
    let (w, h, p, t) = (b.width_m, b.height_m, b.length_m, b.thickness_m());
    let concrete = result.get(QuantityKey::Concrete);
    match key {
        QuantityKey::Concrete => (
            "((w + 2t) x (h + 2t) - w x h) x P".to_string(),
            format!(
                "(({:.2} + 2x{:.2}) x ({:.2} + 2x{:.2}) - {:.2} x {:.2}) x {:.2}",
                w, t, h, t, w, h, p
            ),
        ),
        QuantityKey::Excavation => (
            format!("V.concrete / {}", box_culvert::EXCAVATION_VOID_RATIO),
            format!("{:.3} / {}", concrete, box_culvert::EXCAVATION_VOID_RATIO),
        ),
        QuantityKey::Backfill => (
            format!("V.concrete / {}", box_culvert::BACKFILL_VOID_RATIO),
            format!("{:.3} / {}", concrete, box_culvert::BACKFILL_VOID_RATIO),
        ),
        QuantityKey::Formwork => (
            "(2w + 2h) x P".to_string(),
            format!("(2x{:.2} + 2x{:.2}) x {:.2}", w, h, p),
        ),
        QuantityKey::Reinforcement => (
            format!(
                "2 x ((w + 2t) + (h + 2t)) x {} layers x n bars x kg/m x {}",
                box_culvert::MAIN_LAYERS,
                box_culvert::DISTRIBUTION_STEEL_FACTOR
            ),
            format!(
                "2 x ({:.2} + {:.2}) x {} x {:.0} x {:.3} x {}",
                w + 2.0 * t,
                h + 2.0 * t,
                box_culvert::MAIN_LAYERS,
                bar_count(p, b.bar_spacing_cm),
                bar_unit_weight(b.bar_diameter_mm),
                box_culvert::DISTRIBUTION_STEEL_FACTOR
            ),
        ),
        QuantityKey::Demolition => demolition(result, QuantityKey::Concrete),
        _ => generic(key, result),
    }
}

fn drop_derivation(key: QuantityKey, result: &QuantityResult) -> (String, String) {
    let Some(jump) = &result.hydraulics else {
        return generic(key, result);
    };
    let concrete = result.get(QuantityKey::Concrete);
    let l = jump.total_length_m;
    let wall_height = jump.y2_m + stepped_drop::WALL_FREEBOARD_M;
    match key {
        QuantityKey::Concrete => (
            format!("L x B x tf + n x B x Hs x {} + 2 x L x hw x tw", stepped_drop::SILL_THICKNESS_M),
            format!("L = {:.2}, n = {}, Hs = {:.2}, hw = {:.2}", l, jump.steps, jump.step_height_m, wall_height),
        ),
        QuantityKey::Excavation => (
            format!("V.concrete x {}", stepped_drop::EXCAVATION_FACTOR),
            format!("{:.3} x {}", concrete, stepped_drop::EXCAVATION_FACTOR),
        ),
        QuantityKey::Backfill => (
            format!("V.concrete x {}", stepped_drop::BACKFILL_FACTOR),
            format!("{:.3} x {}", concrete, stepped_drop::BACKFILL_FACTOR),
        ),
        QuantityKey::Reinforcement => steel_by_ratio(result),
        QuantityKey::Formwork => (
            "2 x L x hw + n x B x Hs".to_string(),
            format!("2 x {:.2} x {:.2} + sills", l, wall_height),
        ),
        QuantityKey::Plaster => (
            "2 x L x hw".to_string(),
            format!("2 x {:.2} x {:.2}", l, wall_height),
        ),
        QuantityKey::Demolition => demolition(result, QuantityKey::Concrete),
        _ => generic(key, result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{QuantityResult, Quantities, StructureKind, SteppedDropInput};
    use uuid::Uuid;

    #[test]
    fn test_channel_excavation_working() {
        let mut project = Project::default();
        project.append("Ruas 1", StructureInput::ReinforcedChannel(ChannelInput::default()));
        let rows = explain(&project.items()[0]);

        let excavation = rows.iter().find(|r| r.code == "T.06.a.1").unwrap();
        assert_eq!(excavation.formula, "((Lb + La)/2) x H x P");
        // Lb = 0.6 + 0.3 + 0.4, depth = 0.8 + 0.15 + 0.2, La = Lb + 2 x 0.5 x depth
        assert_eq!(excavation.calculation, "((1.30 + 2.45)/2) x 1.15 x 50.00");

        let formwork = rows.iter().find(|r| r.code == "B.20.a").unwrap();
        assert_eq!(formwork.calculation, "(2 x 0.80) x 50.00 x 2");
    }

    #[test]
    fn test_rows_follow_billed_quantities() {
        let mut project = Project::default();
        project.append("Box", StructureInput::BoxCulvert(BoxCulvertInput::default()));
        let sections = build_backup(&project);
        // concrete, excavation, backfill, steel, formwork
        assert_eq!(sections[0].rows.len(), 5);
        assert!(sections[0].rows.iter().all(|r| !r.formula.is_empty()));
    }

    #[test]
    fn test_masonry_earthworks_working() {
        let mut project = Project::default();
        project.append("Pasangan", StructureInput::MasonryChannel(MasonryChannelInput::default()));
        let rows = explain(&project.items()[0]);
        let masonry = project.items()[0].result.get(QuantityKey::Masonry);

        let excavation = rows.iter().find(|r| r.code == "T.06.a.1").unwrap();
        assert_eq!(excavation.formula, "V.masonry x 1.25");
        assert_eq!(excavation.calculation, format!("{:.3} x 1.25", masonry));
        assert!((excavation.volume - masonry * masonry_channel::EXCAVATION_FACTOR).abs() < 1e-9);

        let backfill = rows.iter().find(|r| r.code == "T.14.a").unwrap();
        assert_eq!(backfill.formula, "(V.excavation - V.masonry) x 0.35");
    }

    #[test]
    fn test_culvert_working_matches_volumes() {
        let mut project = Project::default();
        project.append("Box", StructureInput::BoxCulvert(BoxCulvertInput::default()));
        let rows = explain(&project.items()[0]);

        let excavation = rows.iter().find(|r| r.code == "T.06.a.1").unwrap();
        assert_eq!(excavation.calculation, "5.760 / 0.2");
        assert!((excavation.volume - 5.76 / box_culvert::EXCAVATION_VOID_RATIO).abs() < 1e-9);

        let steel = rows.iter().find(|r| r.code == "B.17.a").unwrap();
        assert_eq!(steel.calculation, "2 x (1.40 + 1.40) x 2 x 41 x 1.042 x 1.2");
    }

    #[test]
    fn test_drop_steel_by_ratio() {
        let mut project = Project::default();
        project.append("Terjunan", StructureInput::SteppedDrop(SteppedDropInput::default()));
        let rows = explain(&project.items()[0]);
        let steel = rows.iter().find(|r| r.code == "B.17.a").unwrap();
        assert_eq!(steel.formula, "Vol. concrete x ratio (kg/m3)");
        assert!(steel.calculation.ends_with(" x 120") || steel.calculation.ends_with(" x 130"));
    }

    #[test]
    fn test_legacy_item_without_dimensions() {
        let item = LineItem {
            id: Uuid::new_v4(),
            name: "Lama".to_string(),
            kind: StructureKind::ReinforcedChannel,
            dimensions: None,
            result: QuantityResult::computed(
                Quantities::new()
                    .with(QuantityKey::Excavation, 10.0)
                    .with(QuantityKey::Concrete, 2.0)
                    .with(QuantityKey::Reinforcement, 240.0),
            ),
        };
        let rows = explain(&item);
        assert_eq!(rows[0].formula, "Cross-section area x length");
        assert_eq!(rows[0].calculation, "Per cross-section profile");

        let steel = rows.iter().find(|r| r.code == "B.17.a").unwrap();
        assert_eq!(steel.calculation, "2.00 x 120");
    }
}
