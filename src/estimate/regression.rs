//! Least-squares line through the Kepler coordinate pairs.
//!
//! The pairs satisfy `y = (π / M)·x`, so the fitted slope `b` gives a
//! set-level mass estimate `M = π / b`. This is the "graphical method"
//! counterpart to averaging per-record estimates.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::domain::KeplerPair;
use crate::math::solve_least_squares;

/// Fitted `y = intercept + slope·x` over the qualified pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeplerFit {
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// `π / slope` (kg).
    pub implied_mass_kg: f64,
}

/// Fit the Kepler line.
///
/// Returns `None` with fewer than two points, degenerate x values, or a
/// non-positive slope.
pub fn fit_kepler_line(pairs: &[KeplerPair]) -> Option<KeplerFit> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    // x is ~1e31 and y ~1e7; scale both to O(1) before solving.
    let x_scale = pairs.iter().map(|p| p.x.abs()).fold(0.0, f64::max);
    let y_scale = pairs.iter().map(|p| p.y.abs()).fold(0.0, f64::max);
    if !(x_scale > 0.0 && x_scale.is_finite() && y_scale > 0.0 && y_scale.is_finite()) {
        return None;
    }

    let mut design = DMatrix::<f64>::zeros(n, 2);
    let mut rhs = DVector::<f64>::zeros(n);
    for (i, p) in pairs.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = p.x / x_scale;
        rhs[i] = p.y / y_scale;
    }

    let beta = solve_least_squares(&design, &rhs)?;
    let intercept = beta[0] * y_scale;
    let slope = beta[1] * y_scale / x_scale;
    if !slope.is_finite() || slope <= 0.0 {
        return None;
    }

    let y_mean = pairs.iter().map(|p| p.y).sum::<f64>() / n as f64;
    let (ss_res, ss_tot) = pairs.iter().fold((0.0, 0.0), |(res, tot), p| {
        let fit = intercept + slope * p.x;
        (res + (p.y - fit).powi(2), tot + (p.y - y_mean).powi(2))
    });
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 1.0 };

    Some(KeplerFit {
        n,
        slope,
        intercept,
        r_squared,
        implied_mass_kg: PI / slope,
    })
}
