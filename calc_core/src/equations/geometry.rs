//! # Section Geometry Formulas
//!
//! Plane-geometry helpers for channel and excavation cross-sections.
//!
//! ## Notation
//!
//! - `h` = Vertical height
//! - `m` = Side slope, horizontal run per unit rise (1:m)
//! - `b` = Bottom width
//! - `B` = Top width

/// Slant length of a sloped side of vertical height `h` and slope 1:m.
///
/// ```text
///        ╱│
///   s  ╱  │ h
///    ╱    │
///   ╱─────┘
///     m·h
/// ```
///
/// # Formula
/// s = h × √(1 + m²)
///
/// # Example
/// ```rust
/// use calc_core::equations::geometry::slant_length;
///
/// assert_eq!(slant_length(0.8, 0.0), 0.8);
/// assert!((slant_length(3.0, 4.0 / 3.0) - 5.0).abs() < 1e-12);
/// ```
#[inline]
pub fn slant_length(h: f64, m: f64) -> f64 {
    h * (1.0 + m * m).sqrt()
}

/// Area of a trapezoid with parallel sides `b` and `top` and height `h`.
///
/// # Formula
/// A = (b + B) / 2 × h
#[inline]
pub fn trapezoid_area(b: f64, top: f64, h: f64) -> f64 {
    (b + top) / 2.0 * h
}

/// Top width of a symmetric trapezoidal cut with bottom `b`, depth `h` and
/// side slope 1:m.
///
/// # Formula
/// B = b + 2·m·h
#[inline]
pub fn trapezoid_top_width(b: f64, h: f64, m: f64) -> f64 {
    b + 2.0 * m * h
}

/// Hollow rectangular prism volume (outer box minus opening).
///
/// # Formula
/// V = (w + 2t)(h + 2t)·L − w·h·L
///
/// # Example
/// ```rust
/// use calc_core::equations::geometry::hollow_box_volume;
///
/// // 1 m × 1 m opening, 0.2 m walls, 6 m long
/// let v = hollow_box_volume(1.0, 1.0, 0.2, 6.0);
/// assert!((v - 5.76).abs() < 1e-9);
/// ```
#[inline]
pub fn hollow_box_volume(w: f64, h: f64, t: f64, length: f64) -> f64 {
    (w + 2.0 * t) * (h + 2.0 * t) * length - w * h * length
}
