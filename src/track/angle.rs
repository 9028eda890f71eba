//! Angle normalization helpers
//!
//! Every angle in the planner is folded back into a canonical range by
//! modulo arithmetic. Non-finite input collapses to zero so downstream
//! geometry never sees NaN.

use std::f64::consts::{PI, TAU};

/// Fold an angle in radians into `(-π, π]`.
pub fn normalize_radians(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut value = angle % TAU;
    if value <= -PI {
        value += TAU;
    }
    if value > PI {
        value -= TAU;
    }
    value
}

/// Fold an angle in degrees into `(-180, 180]`.
pub fn normalize_degrees(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut value = angle % 360.0;
    if value <= -180.0 {
        value += 360.0;
    }
    if value > 180.0 {
        value -= 360.0;
    }
    value
}

/// Fold a rotation in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let value = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if value >= 360.0 {
        0.0
    } else {
        value
    }
}
