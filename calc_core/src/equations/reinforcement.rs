//! # Reinforced Concrete Formulas
//!
//! Simplified flexural checks used to screen the wall and slab thickness and
//! bar layout of small reinforced channels and culverts. Units are mixed the
//! way site engineers enter them: thickness in cm, cover and bar diameter in
//! mm, bar spacing in cm, strengths in MPa.
//!
//! ## References
//!
//! - SNI 2847 (ACI 318 equivalent): minimum steel 1.4/fy, balanced ratio
//!   via the Whitney stress block

use crate::units::{Centimeters, Millimeters};

/// Clear concrete cover to reinforcement (mm)
pub const COVER_MM: f64 = 40.0;

/// Unit weight of water (kN/m³)
pub const GAMMA_WATER: f64 = 9.81;

/// Floor on the effective depth so a thin wall never divides by zero (mm)
pub const MIN_EFFECTIVE_DEPTH_MM: f64 = 1.0;

/// Minimum reinforcement ratio used when fy is not positive
pub const FALLBACK_RHO_MIN: f64 = 0.0014;

/// Fixed maximum reinforcement ratio (culverts, and fallback when fy ≤ 0)
pub const FIXED_RHO_MAX: f64 = 0.025;

/// Effective depth to the bar centroid.
///
/// # Formula
/// d = max(1, t·10 − cover − ø/2)  (mm)
///
/// # Example
/// ```rust
/// use calc_core::equations::reinforcement::effective_depth_mm;
///
/// // 15 cm wall, ø10: 150 − 40 − 5 = 105 mm
/// assert_eq!(effective_depth_mm(15.0, 10.0), 105.0);
/// ```
#[inline]
pub fn effective_depth_mm(thickness_cm: f64, bar_dia_mm: f64) -> f64 {
    let t: Millimeters = Centimeters(thickness_cm).into();
    (t.0 - COVER_MM - bar_dia_mm / 2.0).max(MIN_EFFECTIVE_DEPTH_MM)
}

/// Cross-sectional area of one bar (mm²).
///
/// # Formula
/// A = π/4 × ø²
#[inline]
pub fn bar_area_mm2(bar_dia_mm: f64) -> f64 {
    0.25 * std::f64::consts::PI * bar_dia_mm * bar_dia_mm
}

/// Steel area per metre width, summed over layers.
///
/// # Formula
/// As = (1000 / s) × π/4·ø² × layers, s as entered on site (cm)
///
/// The spacing stays in cm as entered on the form; it is not converted to
/// mm. A non-positive spacing means no bars and gives zero.
///
/// # Example
/// ```rust
/// use calc_core::equations::reinforcement::steel_area_per_meter;
///
/// // ø10 @ 15 cm, one layer: 66.67 × 78.54
/// let a = steel_area_per_meter(10.0, 15.0, 1.0);
/// assert!((a - 5236.0).abs() < 0.1);
/// ```
#[inline]
pub fn steel_area_per_meter(bar_dia_mm: f64, spacing_cm: f64, layers: f64) -> f64 {
    if spacing_cm <= 0.0 {
        return 0.0;
    }
    (1000.0 / spacing_cm) * bar_area_mm2(bar_dia_mm) * layers
}

/// Actual reinforcement ratio over a 1 m strip.
///
/// # Formula
/// ρ = As / (1000 × d)
#[inline]
pub fn reinforcement_ratio(as_per_meter: f64, d_eff_mm: f64) -> f64 {
    as_per_meter / (1000.0 * d_eff_mm)
}

/// Minimum reinforcement ratio ρ_min = 1.4 / fy.
#[inline]
pub fn rho_min(fy_mpa: f64) -> f64 {
    if fy_mpa > 0.0 {
        1.4 / fy_mpa
    } else {
        FALLBACK_RHO_MIN
    }
}

/// Whitney stress-block factor β₁: 0.85 up to f'c 28 MPa, 0.65 above.
#[inline]
pub fn beta1(fc_mpa: f64) -> f64 {
    if fc_mpa <= 28.0 {
        0.85
    } else {
        0.65
    }
}

/// Maximum reinforcement ratio, 0.75 × balanced.
///
/// # Formula
/// ρ_max = 0.75 × (0.85·β₁·f'c / fy) × (600 / (600 + fy))
///
/// # Example
/// ```rust
/// use calc_core::equations::reinforcement::rho_max;
///
/// // f'c 20, fy 280
/// let r = rho_max(20.0, 280.0);
/// assert!((r - 0.02639).abs() < 1e-5);
/// ```
#[inline]
pub fn rho_max(fc_mpa: f64, fy_mpa: f64) -> f64 {
    if fy_mpa <= 0.0 {
        return FIXED_RHO_MAX;
    }
    0.75 * ((0.85 * beta1(fc_mpa) * fc_mpa / fy_mpa) * (600.0 / (600.0 + fy_mpa)))
}

/// Strength-derived thickness from a design moment (m).
///
/// # Formula
/// t = √(Mu / (0.85 × 2000))
#[inline]
pub fn strength_thickness_m(mu: f64) -> f64 {
    (mu.max(0.0) / (0.85 * 2000.0)).sqrt()
}

/// Mass per metre of a steel bar (kg/m), ø in mm.
///
/// # Formula
/// w = 0.006165 × ø²  (ρ_steel = 7850 kg/m³)
///
/// # Example
/// ```rust
/// use calc_core::equations::reinforcement::bar_unit_weight;
///
/// assert!((bar_unit_weight(10.0) - 0.6165).abs() < 1e-12);
/// ```
#[inline]
pub fn bar_unit_weight(bar_dia_mm: f64) -> f64 {
    0.006165 * bar_dia_mm * bar_dia_mm
}

/// Number of bars placed along a run at a spacing given in cm.
///
/// # Formula
/// n = L·100 / s + 1
///
/// A non-positive spacing places no bars.
#[inline]
pub fn bar_count(run_m: f64, spacing_cm: f64) -> f64 {
    if spacing_cm <= 0.0 {
        return 0.0;
    }
    run_m * 100.0 / spacing_cm + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_depth_floor() {
        // 3 cm slab with ø16: 30 − 40 − 8 < 0 → floored
        assert_eq!(effective_depth_mm(3.0, 16.0), MIN_EFFECTIVE_DEPTH_MM);
    }

    #[test]
    fn test_steel_area() {
        // ø10 @ 15 cm, two layers: 66.67 × 78.54 × 2
        let a = steel_area_per_meter(10.0, 15.0, 2.0);
        assert!((a - 10472.0).abs() < 0.1);
        assert_eq!(steel_area_per_meter(10.0, 0.0, 2.0), 0.0);
    }

    #[test]
    fn test_rho_bounds() {
        assert!((rho_min(280.0) - 0.005).abs() < 1e-12);
        assert_eq!(rho_min(0.0), FALLBACK_RHO_MIN);
        assert_eq!(rho_max(25.0, 0.0), FIXED_RHO_MAX);
        // Higher concrete class drops β₁
        assert!(rho_max(30.0, 400.0) < rho_max(28.0, 400.0) * 30.0 / 28.0);
    }

    #[test]
    fn test_bar_count() {
        // 50 m at 15 cm
        assert!((bar_count(50.0, 15.0) - 334.333).abs() < 0.001);
        assert_eq!(bar_count(50.0, 0.0), 0.0);
    }
}
