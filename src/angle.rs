//! Angle utilities for line normals in `[0, π)`.
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

/// Folds a line-normal angle into `(-π/4, π/4]` modulo a quarter turn.
///
/// Horizontal and vertical grid lines differ by π/2, so after folding both
/// families of a grid tilted by `a` land on `a`.
#[inline]
pub fn fold_quarter_turn(theta: f32) -> f32 {
    let folded = FRAC_PI_4 - (FRAC_PI_4 - theta).rem_euclid(FRAC_PI_2);
    // rem_euclid may round up to exactly π/2 for inputs just above a multiple.
    if folded <= -FRAC_PI_4 {
        folded + FRAC_PI_2
    } else {
        folded
    }
}

/// True when a folded angle is strictly inside `(-π/4, π/4)`, i.e. it is not
/// equally close to both grid orientations.
#[inline]
pub fn is_unambiguous_fold(folded: f32) -> bool {
    const EDGE_EPS: f32 = 1e-4;
    folded.abs() < FRAC_PI_4 - EDGE_EPS
}

/// A normal angle close to π/2 describes a near-horizontal line.
#[inline]
pub fn is_near_horizontal(theta: f32, max_abs_cos: f32) -> bool {
    theta.cos().abs() < max_abs_cos
}
