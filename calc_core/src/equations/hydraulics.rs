//! # Open-Channel Hydraulics Formulas
//!
//! Closed-form relations for sizing the stilling basin below a vertical drop.
//!
//! ## Notation
//!
//! - `q` = Unit discharge Q/B (m³/s per m)
//! - `V1` = Velocity at the toe of the drop (m/s)
//! - `y1`, `y2` = Supercritical depth and its conjugate (sequent) depth (m)
//! - `Fr1` = Froude number at the toe
//!
//! ## References
//!
//! - USBR Engineering Monograph No. 25, Hydraulic Design of Stilling Basins
//! - Chow, Open-Channel Hydraulics, Ch. 15 (hydraulic jump)

/// Gravitational acceleration (m/s²)
pub const G: f64 = 9.81;

/// Velocity after a free fall of height `h`.
///
/// # Formula
/// V = √(2·g·h)
#[inline]
pub fn free_fall_velocity(h: f64) -> f64 {
    (2.0 * G * h).sqrt()
}

/// Froude number of a flow of velocity `v` and depth `y`.
///
/// # Formula
/// Fr = V / √(g·y)
#[inline]
pub fn froude_number(v: f64, y: f64) -> f64 {
    v / (G * y).sqrt()
}

/// Conjugate (sequent) depth downstream of a hydraulic jump.
///
/// # Formula (Bélanger)
/// y2 = ½·y1·(√(1 + 8·Fr1²) − 1)
///
/// # Example
/// ```rust
/// use calc_core::equations::hydraulics::conjugate_depth;
///
/// // Fr1 = 1 is critical flow: no jump, y2 = y1
/// assert!((conjugate_depth(0.3, 1.0) - 0.3).abs() < 1e-12);
/// ```
#[inline]
pub fn conjugate_depth(y1: f64, fr1: f64) -> f64 {
    0.5 * y1 * ((1.0 + 8.0 * fr1 * fr1).sqrt() - 1.0)
}

/// Horizontal length of the falling nappe for a vertical drop.
///
/// # Formula
/// Ld = 4.30 · H · D^0.27, with drop number D = q² / (g·H³)
#[inline]
pub fn drop_length(q: f64, h: f64) -> f64 {
    let drop_number = q * q / (G * h.powi(3));
    4.30 * h * drop_number.powf(0.27)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_fall_velocity() {
        // 1.5 m fall: √29.43 = 5.425
        assert!((free_fall_velocity(1.5) - 5.4249).abs() < 1e-3);
    }

    #[test]
    fn test_froude_roundtrip() {
        let y = 0.2;
        let v = 3.0 * (G * y).sqrt();
        assert!((froude_number(v, y) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_conjugate_depth_grows_with_froude() {
        let low = conjugate_depth(0.1, 2.0);
        let high = conjugate_depth(0.1, 6.0);
        assert!(high > low);
        assert!(low > 0.1);
    }

    #[test]
    fn test_drop_length_positive() {
        assert!(drop_length(1.0, 1.5) > 0.0);
    }
}
