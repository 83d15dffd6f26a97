//! # Engineering Equations
//!
//! The closed-form formulas the structure calculators are built from, kept in
//! one place so each can be checked against its reference on its own:
//!
//! - [`geometry`] - Trapezoid, slant length and hollow box formulas
//! - [`reinforcement`] - Effective depth, steel ratio bounds, bar weights
//! - [`hydraulics`] - Free fall, Froude number, hydraulic jump, drop length
//!
//! ## Units
//!
//! Metres, seconds and kN throughout, except where a function name carries a
//! unit suffix (`_mm`, `_cm`, `_mpa`).

pub mod geometry;
pub mod hydraulics;
pub mod reinforcement;

pub use geometry::{hollow_box_volume, slant_length, trapezoid_area, trapezoid_top_width};
pub use hydraulics::{conjugate_depth, drop_length, free_fall_velocity, froude_number, G};
pub use reinforcement::{
    bar_count, bar_unit_weight, effective_depth_mm, reinforcement_ratio, rho_max, rho_min,
    steel_area_per_meter, strength_thickness_m, GAMMA_WATER,
};
