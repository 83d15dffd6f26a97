//! # Unit-Price Engine
//!
//! Turns a regional [`PriceCatalog`] and an overhead-and-profit percentage into
//! unit prices for the work items of the water-resources analysis catalog.
//!
//! - [`catalog`] - The flat labour/material price set
//! - [`ahsp`] - Compiled-in recipe table, lookup and unit price
//! - [`analysis`] - Analysis form breakdown and the priced schedule

pub mod ahsp;
pub mod analysis;
pub mod catalog;

pub use ahsp::{get_recipe, recipe_codes, unit_price, Recipe, ResourceClass, ResourceLine, NOT_FOUND_CODE};
pub use analysis::{price_analysis, AnalysisRow, PriceAnalysis, ScheduleEntry, UnitPriceSchedule};
pub use catalog::{PriceCatalog, PriceKey};
