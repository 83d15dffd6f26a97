//! # Saluran CLI Application
//!
//! Terminal front end for the estimating engine: price list, unit-price
//! analyses, structure quantities and the priced bill of a project file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use calc_core::backup::build_backup;
use calc_core::boq::{price_project, BillOfQuantities};
use calc_core::calculations::{
    BoxCulvertInput, ChannelInput, MasonryChannelInput, QuantityKey, QuantityResult,
    SteppedDropInput, StructureInput,
};
use calc_core::config::{self, EstimatorConfig, DEFAULT_CONFIG_FILE};
use calc_core::file_io::{self, FileLock};
use calc_core::pricing::price_analysis;
use calc_core::project::ProjectSettings;
use calc_core::{CalcError, CalcResult};

#[derive(Parser)]
#[command(name = "calc_cli")]
#[command(about = "Quantity and cost estimating for irrigation channels, culverts and drops")]
struct Cli {
    /// Estimator configuration (prices, overhead, tax)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the unit price of every work item
    Prices,

    /// Show the unit-price analysis form for one work item
    Analysis {
        /// Work item code (e.g. "B.05.a")
        code: String,
    },

    /// Reinforced concrete channel
    Channel {
        #[command(flatten)]
        dims: ChannelArgs,
        #[command(flatten)]
        target: ProjectTarget,
    },

    /// Stone masonry channel
    Masonry {
        #[command(flatten)]
        dims: MasonryArgs,
        #[command(flatten)]
        target: ProjectTarget,
    },

    /// Reinforced concrete box culvert
    Culvert {
        #[command(flatten)]
        dims: CulvertArgs,
        #[command(flatten)]
        target: ProjectTarget,
    },

    /// Stepped drop with USBR stilling basins
    Drop {
        #[command(flatten)]
        dims: DropArgs,
        #[command(flatten)]
        target: ProjectTarget,
    },

    /// List the line items of a project
    List {
        project: PathBuf,
    },

    /// Remove every line item from a project
    Clear {
        project: PathBuf,
    },

    /// Show or change the overhead and tax a project is priced with
    Settings {
        project: PathBuf,

        /// Overhead and profit on unit prices (%)
        #[arg(long)]
        overhead: Option<f64>,

        /// Tax on the bill total (%)
        #[arg(long)]
        tax: Option<f64>,
    },

    /// Priced bill of quantities for a project
    Boq {
        project: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Volume back-up sheet for a project
    Backup {
        project: PathBuf,
    },

    /// Print the whole project as JSON
    Snapshot {
        project: PathBuf,
    },

    /// Write the default configuration file if it does not exist
    InitConfig,
}

/// Where to store a computed structure
#[derive(Args)]
struct ProjectTarget {
    /// Append the result to this project file
    #[arg(long)]
    project: Option<PathBuf>,

    /// Line item name
    #[arg(long, default_value = "Item")]
    name: String,

    /// Replaces an existing structure (adds demolition)
    #[arg(long)]
    rehab: bool,
}

#[derive(Args)]
struct ChannelArgs {
    /// Inner height (m)
    #[arg(long, default_value_t = 0.8)]
    height: f64,
    /// Inner base width (m)
    #[arg(long, default_value_t = 0.6)]
    width: f64,
    /// Wall slope 1:m
    #[arg(long, default_value_t = 0.0)]
    slope: f64,
    /// Length (m)
    #[arg(long, default_value_t = 50.0)]
    length: f64,
    /// Wall thickness (cm)
    #[arg(long, default_value_t = 15.0)]
    thickness: f64,
    /// Bar diameter (mm)
    #[arg(long, default_value_t = 10.0)]
    bar: f64,
    /// Bar spacing (cm)
    #[arg(long, default_value_t = 15.0)]
    spacing: f64,
    #[arg(long, default_value_t = 2)]
    layers: u32,
    /// Steel waste (%)
    #[arg(long, default_value_t = 5.0)]
    waste: f64,
    #[arg(long, default_value_t = 20.0)]
    fc: f64,
    #[arg(long, default_value_t = 280.0)]
    fy: f64,
}

impl ChannelArgs {
    fn input(&self, rehabilitation: bool) -> ChannelInput {
        ChannelInput {
            height_m: self.height,
            base_width_m: self.width,
            side_slope: self.slope,
            length_m: self.length,
            thickness_cm: self.thickness,
            bar_diameter_mm: self.bar,
            bar_spacing_cm: self.spacing,
            layers: self.layers,
            waste_pct: self.waste,
            fc_mpa: self.fc,
            fy_mpa: self.fy,
            rehabilitation,
        }
    }
}

#[derive(Args)]
struct MasonryArgs {
    /// Wall height (m)
    #[arg(long, default_value_t = 0.8)]
    height: f64,
    /// Floor width (m)
    #[arg(long, default_value_t = 0.5)]
    width: f64,
    /// Inner face slope 1:m
    #[arg(long, default_value_t = 0.2)]
    slope: f64,
    /// Length (m)
    #[arg(long, default_value_t = 50.0)]
    length: f64,
    /// Wall crest width (m)
    #[arg(long, default_value_t = 0.3)]
    top: f64,
    /// Wall footing width (m)
    #[arg(long, default_value_t = 0.4)]
    bottom: f64,
    /// Floor thickness (m)
    #[arg(long, default_value_t = 0.2)]
    floor: f64,
}

impl MasonryArgs {
    fn input(&self, rehabilitation: bool) -> MasonryChannelInput {
        MasonryChannelInput {
            height_m: self.height,
            base_width_m: self.width,
            side_slope: self.slope,
            length_m: self.length,
            top_width_m: self.top,
            bottom_width_m: self.bottom,
            floor_thickness_m: self.floor,
            rehabilitation,
        }
    }
}

#[derive(Args)]
struct CulvertArgs {
    /// Inner width (m)
    #[arg(long, default_value_t = 1.0)]
    width: f64,
    /// Inner height (m)
    #[arg(long, default_value_t = 1.0)]
    height: f64,
    /// Barrel length (m)
    #[arg(long, default_value_t = 6.0)]
    length: f64,
    /// Wall/slab thickness (cm)
    #[arg(long, default_value_t = 20.0)]
    thickness: f64,
    #[arg(long, default_value_t = 13.0)]
    bar: f64,
    #[arg(long, default_value_t = 15.0)]
    spacing: f64,
    #[arg(long, default_value_t = 25.0)]
    fc: f64,
    #[arg(long, default_value_t = 400.0)]
    fy: f64,
}

impl CulvertArgs {
    fn input(&self, rehabilitation: bool) -> BoxCulvertInput {
        BoxCulvertInput {
            width_m: self.width,
            height_m: self.height,
            length_m: self.length,
            thickness_cm: self.thickness,
            bar_diameter_mm: self.bar,
            bar_spacing_cm: self.spacing,
            fc_mpa: self.fc,
            fy_mpa: self.fy,
            rehabilitation,
        }
    }
}

#[derive(Args)]
struct DropArgs {
    /// Design discharge (m3/s)
    #[arg(long, default_value_t = 1.5)]
    discharge: f64,
    /// Total drop (m)
    #[arg(long, default_value_t = 3.0)]
    total_drop: f64,
    /// Maximum step height (m)
    #[arg(long, default_value_t = 1.5)]
    max_step: f64,
    /// Width (m)
    #[arg(long, default_value_t = 1.5)]
    width: f64,
    #[arg(long, default_value_t = 0.25)]
    floor: f64,
    #[arg(long, default_value_t = 0.25)]
    wall: f64,
    /// Allowable bearing (kPa)
    #[arg(long, default_value_t = 150.0)]
    bearing: f64,
    /// Full basin on every step
    #[arg(long)]
    no_economy: bool,
}

impl DropArgs {
    fn input(&self, rehabilitation: bool) -> SteppedDropInput {
        SteppedDropInput {
            discharge_m3s: self.discharge,
            total_drop_m: self.total_drop,
            max_step_height_m: self.max_step,
            width_m: self.width,
            floor_thickness_m: self.floor,
            wall_thickness_m: self.wall,
            allowable_bearing_kpa: self.bearing,
            economy_mode: !self.no_economy,
            rehabilitation,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG wins; otherwise warn, raised by -v
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CalcResult<()> {
    if let Commands::InitConfig = cli.command {
        config::load_or_default(&cli.config)?;
        println!("Configuration: {}", cli.config.display());
        return Ok(());
    }

    let cfg = load_settings(&cli.config)?;

    match cli.command {
        Commands::Prices => print_prices(&cfg),
        Commands::Analysis { code } => print_analysis(&cfg, &code)?,
        Commands::Channel { dims, target } => {
            let input = StructureInput::ReinforcedChannel(dims.input(target.rehab));
            compute_and_store(input, &target, &cfg)?;
        }
        Commands::Masonry { dims, target } => {
            let input = StructureInput::MasonryChannel(dims.input(target.rehab));
            compute_and_store(input, &target, &cfg)?;
        }
        Commands::Culvert { dims, target } => {
            let input = StructureInput::BoxCulvert(dims.input(target.rehab));
            compute_and_store(input, &target, &cfg)?;
        }
        Commands::Drop { dims, target } => {
            let input = StructureInput::SteppedDrop(dims.input(target.rehab));
            compute_and_store(input, &target, &cfg)?;
        }
        Commands::List { project } => {
            let project = file_io::load_project(&project)?;
            if project.is_empty() {
                println!("No items. Add one with e.g. 'channel --project <file>'.");
            }
            for (i, item) in project.items().iter().enumerate() {
                println!(
                    "{:>3}. {:<32} {:<28} {}",
                    i + 1,
                    item.name,
                    item.kind.label(),
                    item.result.status.label()
                );
            }
        }
        Commands::Clear { project: path } => {
            let _lock = FileLock::acquire(&path, user_id())?;
            let mut project = file_io::load_project(&path)?;
            let removed = project.len();
            project.clear();
            file_io::save_project(&project, &path)?;
            println!("Removed {} item(s) from {}", removed, path.display());
        }
        Commands::Settings { project: path, overhead, tax } => {
            if overhead.is_none() && tax.is_none() {
                let project = file_io::load_project(&path)?;
                print_settings(&project.settings);
                return Ok(());
            }
            let _lock = FileLock::acquire(&path, user_id())?;
            let mut project = file_io::load_project(&path)?;
            if let Some(overhead) = overhead {
                project.settings.overhead_pct = overhead;
            }
            if let Some(tax) = tax {
                project.settings.tax_pct = tax;
            }
            validate_settings(&project.settings)?;
            project.touch();
            file_io::save_project(&project, &path)?;
            print_settings(&project.settings);
        }
        Commands::Boq { project, json } => {
            let project = file_io::load_project(&project)?;
            let bill = price_project(&project, &cfg.prices);
            if json {
                println!("{}", to_json(&bill)?);
            } else {
                print_bill(&bill);
            }
        }
        Commands::Backup { project } => {
            let project = file_io::load_project(&project)?;
            for section in build_backup(&project) {
                println!("{}. {}", section.number, section.name);
                for row in section.rows {
                    println!("   {:<9} {}", row.code, row.description);
                    println!("             {}", row.formula);
                    println!("             {}", row.calculation);
                    println!("             = {:.3} {}", row.volume, row.unit);
                }
            }
        }
        Commands::Snapshot { project } => {
            let project = file_io::load_project(&project)?;
            println!("{}", project.snapshot_json()?);
        }
        Commands::InitConfig => {}
    }
    Ok(())
}

/// Configuration file if present, built-in defaults otherwise
fn load_settings(path: &Path) -> CalcResult<EstimatorConfig> {
    if path.exists() {
        config::load_config(path)
    } else {
        tracing::info!(path = %path.display(), "no configuration file, using defaults");
        Ok(EstimatorConfig::default())
    }
}

fn user_id() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "estimator".to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> CalcResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CalcError::serialization(e.to_string()))
}

fn validate_settings(settings: &ProjectSettings) -> CalcResult<()> {
    EstimatorConfig {
        overhead_pct: settings.overhead_pct,
        tax_pct: settings.tax_pct,
        ..EstimatorConfig::default()
    }
    .validate()
}

fn print_settings(settings: &ProjectSettings) {
    println!("Overhead and profit: {:.1}%", settings.overhead_pct);
    println!("Tax:                 {:.1}%", settings.tax_pct);
}

/// A new project file takes its percentages from the configuration
fn compute_and_store(input: StructureInput, target: &ProjectTarget, cfg: &EstimatorConfig) -> CalcResult<()> {
    match &target.project {
        Some(path) => {
            let _lock = FileLock::acquire(path, user_id())?;
            let mut project = file_io::load_or_new(path, ProjectSettings::from(cfg))?;
            let item = project.append(target.name.clone(), input);
            print_result(&item.name, item.kind.label(), &item.result);
            println!("{}", to_json(&item.result)?);
            file_io::save_project(&project, path)?;
            println!();
            println!("Saved to {} ({} item(s))", path.display(), project.len());
        }
        None => {
            let result = input.compute();
            print_result(&target.name, input.kind().label(), &result);
            println!("{}", to_json(&result)?);
        }
    }
    Ok(())
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_result(name: &str, kind: &str, result: &QuantityResult) {
    println!("═══════════════════════════════════════");
    println!("  {} - {}", name, kind);
    println!("═══════════════════════════════════════");
    if result.is_no_data() {
        println!("  No data: dimensions are not positive.");
        println!();
        return;
    }

    println!();
    println!("Quantities:");
    for key in QuantityKey::ALL {
        let value = result.get(key);
        if value > 0.0 {
            println!("  {:<22} {:>12.3} {}", key.label(), value, key.unit());
        }
    }

    if let Some(mu) = result.design_moment_knm {
        println!();
        println!("Design:");
        println!("  Mu = {:.3} kN·m/m", mu);
    }
    if let Some(t) = result.recommended_thickness_cm {
        println!("  Recommended thickness ≥ {:.1} cm", t);
    }
    if let Some(check) = &result.reinforcement_check {
        println!(
            "  ρ = {:.5} (min {:.5}, max {:.5}) {} {}",
            check.actual,
            check.min,
            check.max,
            check.status.label(),
            status_icon(check.is_adequate())
        );
    }
    if let Some(jump) = &result.hydraulics {
        println!();
        println!("Hydraulics: {}", jump.summary());
        println!(
            "  Fr1 = {:.2}, V1 = {:.2} m/s, y1 = {:.3} m, y2 = {:.3} m",
            jump.froude, jump.velocity_ms, jump.y1_m, jump.y2_m
        );
        println!(
            "  {} x {:.2} m steps, drop length {:.2} m, basins {:.2} / {:.2} m, total {:.2} m",
            jump.steps,
            jump.step_height_m,
            jump.drop_length_m,
            jump.intermediate_basin_m,
            jump.final_basin_m,
            jump.total_length_m
        );
    }
    if let Some(stability) = &result.stability {
        println!(
            "  Uplift SF = {:.2} {} {}",
            stability.safety_factor,
            stability.uplift_status.label(),
            status_icon(stability.uplift_status == calc_core::calculations::UpliftStatus::Safe)
        );
        println!(
            "  Net bearing = {:.1} kPa (allow {:.0}) {} {}",
            stability.net_pressure_kpa,
            stability.allowable_kpa,
            stability.bearing_status.label(),
            status_icon(stability.bearing_status == calc_core::calculations::BearingStatus::Safe)
        );
    }
    println!();
}

fn print_prices(cfg: &EstimatorConfig) {
    let schedule = cfg.schedule();
    println!("Unit prices (overhead {:.1}%)", schedule.overhead_pct);
    println!("{:<14} {:<44} {:>5} {:>14}", "Code", "Description", "Unit", "Price");
    println!("{}", "-".repeat(80));
    for (_, entry) in schedule.ordered() {
        println!(
            "{:<14} {:<44} {:>5} {:>14.2}",
            entry.code, entry.description, entry.unit, entry.unit_price
        );
    }
}

fn print_analysis(cfg: &EstimatorConfig, code: &str) -> CalcResult<()> {
    let analysis = price_analysis(code, &cfg.prices, cfg.overhead_pct);
    if !analysis.is_found() {
        return Err(CalcError::unknown_work_item(code));
    }
    println!("{} - {} (per {})", analysis.code, analysis.description, analysis.unit);
    println!("{}", "-".repeat(78));
    for row in &analysis.rows {
        println!(
            "  {:<30} {:>8.4} {:<4} x {:>14.2} = {:>14.2}",
            row.name, row.coefficient, row.unit, row.unit_price, row.amount
        );
    }
    println!("{}", "-".repeat(78));
    println!("  A. Labour                                           {:>14.2}", analysis.labor_total);
    println!("  B. Materials                                        {:>14.2}", analysis.material_total);
    println!("  C. Labour + materials                               {:>14.2}", analysis.base_total);
    println!(
        "  D. Overhead and profit {:>5.1}%                       {:>14.2}",
        analysis.overhead_pct, analysis.overhead_value
    );
    println!("  E. Unit price (C + D)                               {:>14.2}", analysis.unit_price);
    Ok(())
}

fn print_bill(bill: &BillOfQuantities) {
    for section in &bill.sections {
        println!("{}. {} ({})", section.number, section.name, section.kind.label());
        for row in &section.rows {
            println!(
                "   {:<9} {:<32} {:>10.3} {:<3} {:>13.2} {:>16.2}",
                row.code, row.description, row.volume, row.unit, row.unit_price, row.amount
            );
        }
        println!("   {:>85}", format!("Subtotal {:.2}", section.subtotal));
    }
    println!("{}", "=".repeat(90));
    println!("   Total                    {:>20.2}", bill.grand_total);
    println!("   Tax {:>5.1}%               {:>20.2}", bill.tax_pct, bill.tax);
    println!("   Total including tax      {:>20.2}", bill.total_with_tax);
}
