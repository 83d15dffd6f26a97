//! End-to-end: dimensions -> quantities -> project file -> priced bill.

use std::env::temp_dir;
use std::fs;

use calc_core::backup::build_backup;
use calc_core::boq::{build_boq, price_project};
use calc_core::calculations::{
    BasinType, BoxCulvertInput, ChannelInput, MasonryChannelInput, QuantityKey, RatioStatus,
    SteppedDropInput, StructureInput,
};
use calc_core::config::EstimatorConfig;
use calc_core::file_io::{load_project, save_project};
use calc_core::pricing::{price_analysis, recipe_codes, unit_price, PriceCatalog};
use calc_core::project::{Project, ProjectSettings};

fn sample_project() -> Project {
    let mut project = Project::new("Daerah Irigasi Cikunten", "Estimator", "Tasikmalaya");
    project.append("Saluran sekunder", StructureInput::ReinforcedChannel(ChannelInput::default()));
    project.append(
        "Saluran tersier",
        StructureInput::MasonryChannel(MasonryChannelInput {
            rehabilitation: true,
            ..MasonryChannelInput::default()
        }),
    );
    project.append("Gorong-gorong", StructureInput::BoxCulvert(BoxCulvertInput::default()));
    project.append("Terjunan", StructureInput::SteppedDrop(SteppedDropInput::default()));
    project
}

#[test]
fn reference_channel_quantities() {
    let result = StructureInput::ReinforcedChannel(ChannelInput::default()).compute();

    let concrete = result.get(QuantityKey::Concrete);
    let excavation = result.get(QuantityKey::Excavation);
    assert!(excavation > concrete && concrete > 0.0);
    assert!(result.get(QuantityKey::Reinforcement) > 0.0);
    assert_eq!(result.get(QuantityKey::Demolition), 0.0);

    // ø10 @ 15 cm in two layers screens as over-reinforced for a 15 cm wall
    let check = result.reinforcement_check.unwrap();
    assert!((check.actual - 0.09973).abs() < 1e-4);
    assert_eq!(check.status, RatioStatus::OverReinforced);
}

#[test]
fn excavation_exceeds_concrete_across_channel_sizes() {
    for height in [0.4, 0.8, 1.5, 2.5] {
        for width in [0.3, 0.6, 1.2] {
            for slope in [0.0, 0.5, 1.0] {
                let result = StructureInput::ReinforcedChannel(ChannelInput {
                    height_m: height,
                    base_width_m: width,
                    side_slope: slope,
                    ..ChannelInput::default()
                })
                .compute();
                assert!(
                    result.get(QuantityKey::Excavation) >= result.get(QuantityKey::Concrete),
                    "H={} B={} m={}",
                    height,
                    width,
                    slope
                );
            }
        }
    }
}

#[test]
fn degenerate_inputs_never_panic() {
    let inputs = [
        StructureInput::ReinforcedChannel(ChannelInput { height_m: 0.0, ..ChannelInput::default() }),
        StructureInput::ReinforcedChannel(ChannelInput { length_m: 0.0, ..ChannelInput::default() }),
        StructureInput::MasonryChannel(MasonryChannelInput { length_m: -2.0, ..MasonryChannelInput::default() }),
        StructureInput::BoxCulvert(BoxCulvertInput { width_m: 0.0, ..BoxCulvertInput::default() }),
        StructureInput::SteppedDrop(SteppedDropInput { total_drop_m: 0.0, ..SteppedDropInput::default() }),
    ];
    for input in inputs {
        let result = input.compute();
        assert!(result.is_no_data(), "{:?}", input.kind());
        assert!(QuantityKey::ALL.iter().all(|k| result.get(*k) <= 0.0));
    }

    // Zero discharge is clamped rather than rejected
    let clamped = StructureInput::SteppedDrop(SteppedDropInput {
        discharge_m3s: 0.0,
        ..SteppedDropInput::default()
    })
    .compute();
    assert!(!clamped.is_no_data());
    assert!(clamped.get(QuantityKey::Concrete) > 0.0);
}

#[test]
fn unit_price_monotone_in_overhead() {
    let prices = PriceCatalog::default();
    for code in recipe_codes() {
        let base = price_analysis(code, &prices, 0.0).base_total;
        assert!((unit_price(code, &prices, 0.0) - base).abs() < 1e-6);

        let mut previous = 0.0;
        for overhead in [0.0, 5.0, 10.0, 15.0, 25.0] {
            let price = unit_price(code, &prices, overhead);
            assert!(price >= previous, "{} at {}%", code, overhead);
            previous = price;
        }
    }
}

#[test]
fn unknown_code_prices_at_zero() {
    let prices = PriceCatalog::default();
    assert_eq!(unit_price("X.99.z", &prices, 15.0), 0.0);
    assert!(!price_analysis("X.99.z", &prices, 15.0).is_found());
}

#[test]
fn drop_reports_hydraulics_and_stability() {
    let result = StructureInput::SteppedDrop(SteppedDropInput::default()).compute();
    let jump = result.hydraulics.as_ref().unwrap();
    assert_eq!(jump.basin_type, BasinType::UsbrTypeIV);
    assert!(jump.y2_m > jump.y1_m);
    assert!(jump.total_length_m > 0.0);

    let stability = result.stability.as_ref().unwrap();
    assert!(stability.safety_factor > 0.0);
    assert!(stability.net_pressure_kpa >= 0.0);
}

#[test]
fn project_file_roundtrip_keeps_results() {
    let project = sample_project();
    let path = temp_dir().join(format!("saluran_workflow_{}.rab", std::process::id()));

    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(loaded.len(), 4);
    for (before, after) in project.items().iter().zip(loaded.items()) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.result, after.result);
        assert_eq!(before.dimensions, after.dimensions);
    }
    assert_eq!(loaded.items()[1].name, "Saluran tersier (REHAB)");
}

#[test]
fn bill_of_quantities_totals() {
    let project = sample_project();
    let config = EstimatorConfig::default();
    let bill = build_boq(&project, &config.schedule(), config.tax_pct);
    assert_eq!(bill, price_project(&project, &config.prices));

    assert_eq!(bill.sections.len(), 4);
    let sum: f64 = bill.rows().map(|(_, row)| row.amount).sum();
    assert!((bill.grand_total - sum).abs() < 1e-3);
    assert!((bill.total_with_tax - bill.grand_total * 1.11).abs() < 1e-3);

    // The rehabilitated masonry channel carries a demolition row
    assert!(bill.sections[1].rows.iter().any(|r| r.code == "T.15.a"));
    assert!(!bill.sections[0].rows.iter().any(|r| r.code == "T.15.a"));

    let backup = build_backup(&project);
    for (bill_section, backup_section) in bill.sections.iter().zip(&backup) {
        assert_eq!(bill_section.rows.len(), backup_section.rows.len());
    }
}

#[test]
fn saved_project_keeps_its_own_percentages() {
    let config = EstimatorConfig {
        overhead_pct: 10.0,
        tax_pct: 0.0,
        ..EstimatorConfig::default()
    };
    let mut project = Project::with_settings("Tanpa PPN", "Estimator", "Garut", ProjectSettings::from(&config));
    project.append("Saluran", StructureInput::ReinforcedChannel(ChannelInput::default()));

    let path = temp_dir().join(format!("saluran_settings_{}.rab", std::process::id()));
    save_project(&project, &path).unwrap();
    let loaded = load_project(&path).unwrap();
    let _ = fs::remove_file(&path);

    // Priced with the defaults (15 % / 11 %) the bill would carry tax
    let bill = price_project(&loaded, &EstimatorConfig::default().prices);
    assert_eq!(bill.tax, 0.0);
    assert!(bill.grand_total > 0.0);
    let row = bill.rows().next().unwrap().1;
    assert!((row.unit_price - unit_price(&row.code, &config.prices, 10.0)).abs() < 1e-6);
}

#[test]
fn snapshot_is_valid_json() {
    let project = sample_project();
    let json = project.snapshot_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["items"].as_array().unwrap().len(), 4);
    assert_eq!(value["items"][2]["dimensions"]["type"], "BoxCulvert");
}
