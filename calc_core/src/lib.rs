//! # calc_core - Irrigation Works Estimating Engine
//!
//! `calc_core` prices small water-resources civil works: channels, box
//! culverts and stepped drop structures. It derives construction quantities
//! from structure dimensions, prices them with unit-price analyses built from
//! a regional price list, and assembles a bill of quantities. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless calculators**: Pure functions from dimensions to quantities
//! - **Never fail on geometry**: Degenerate input gives a "no data" result
//! - **JSON-First**: Every type implements Serialize/Deserialize
//! - **Explicit project state**: A `Project` value the caller owns and saves
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::boq::build_boq;
//! use calc_core::calculations::{ChannelInput, StructureInput};
//! use calc_core::config::EstimatorConfig;
//! use calc_core::project::Project;
//!
//! let config = EstimatorConfig::default();
//! let mut project = Project::new("Saluran Sekunder", "Estimator", "Garut");
//! project.append("Ruas 1", StructureInput::ReinforcedChannel(ChannelInput::default()));
//!
//! let bill = build_boq(&project, &config.schedule(), config.tax_pct);
//! assert!(bill.total_with_tax > bill.grand_total);
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Price catalog, unit-price analysis recipes, schedules
//! - [`calculations`] - Structure calculators and quantity results
//! - [`equations`] - Geometry, reinforcement and hydraulics formulas
//! - [`boq`] - Priced bill of quantities
//! - [`backup`] - Volume back-up sheet (formula and working per quantity)
//! - [`project`] - Project container and line items
//! - [`file_io`] - Atomic saves and file locking
//! - [`config`] - TOML estimator configuration
//! - [`units`] - Type-safe length wrappers
//! - [`errors`] - Structured error types

pub mod backup;
pub mod boq;
pub mod calculations;
pub mod config;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod pricing;
pub mod project;
pub mod units;

pub use calculations::{QuantityKey, QuantityResult, StructureInput, StructureKind};
pub use config::EstimatorConfig;
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{LineItem, Project, ProjectMetadata, ProjectSettings};
