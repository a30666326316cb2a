//! Per-item parameter estimation.
//!
//! Each item's difficulty (b) and discrimination (a) are updated
//! separately by one-dimensional Newton-Raphson against a fixed ability
//! vector, then clamped into their bounds:
//!
//! ```text
//! b: gradient = -a Σ (uᵢ - Pᵢ)          information = a² Σ Pᵢ(1-Pᵢ)
//! a: gradient = Σ (θᵢ - b)(uᵢ - Pᵢ)     information = Σ (θᵢ - b)² Pᵢ(1-Pᵢ)
//! ```
//!
//! The overflow-guarded probability function is reused here, so no
//! additional numerical guard is needed beyond the information check and
//! the final clamp.

use crate::domain::CalibrationConfig;
use crate::estimate::STEP_TOLERANCE;
use crate::math::{INFO_EPSILON, probability};

/// Estimate an item's difficulty holding its discrimination fixed.
///
/// `responses` is the item's column aligned with `thetas`; `None` cells
/// are unobserved pairs. Clamped into `config.difficulty_bounds`.
pub fn estimate_difficulty(
    responses: &[Option<f64>],
    thetas: &[f64],
    a: f64,
    b_start: f64,
    config: &CalibrationConfig,
) -> f64 {
    debug_assert_eq!(responses.len(), thetas.len());
    let (b_min, b_max) = config.difficulty_bounds;
    let mut b = b_start.clamp(b_min, b_max);

    for _ in 0..config.newton_iterations {
        let mut gradient = 0.0;
        let mut information = 0.0;
        for (response, &theta) in responses.iter().zip(thetas) {
            let Some(u) = *response else { continue };
            let p = probability(theta, a, b);
            gradient += -a * (u - p);
            information += a * a * p * (1.0 - p);
        }

        if information <= INFO_EPSILON {
            break;
        }

        let step = gradient / information;
        b = (b + step).clamp(b_min, b_max);
        if step.abs() < STEP_TOLERANCE {
            break;
        }
    }

    b
}

/// Estimate an item's discrimination holding its difficulty fixed.
///
/// Clamped into `config.discrimination_bounds` (positive by
/// construction: the lower bound is 0.1).
pub fn estimate_discrimination(
    responses: &[Option<f64>],
    thetas: &[f64],
    a_start: f64,
    b: f64,
    config: &CalibrationConfig,
) -> f64 {
    debug_assert_eq!(responses.len(), thetas.len());
    let (a_min, a_max) = config.discrimination_bounds;
    let mut a = a_start.clamp(a_min, a_max);

    for _ in 0..config.newton_iterations {
        let mut gradient = 0.0;
        let mut information = 0.0;
        for (response, &theta) in responses.iter().zip(thetas) {
            let Some(u) = *response else { continue };
            let p = probability(theta, a, b);
            let d = theta - b;
            gradient += d * (u - p);
            information += d * d * p * (1.0 - p);
        }

        if information <= INFO_EPSILON {
            break;
        }

        let step = gradient / information;
        a = (a + step).clamp(a_min, a_max);
        if step.abs() < STEP_TOLERANCE {
            break;
        }
    }

    a
}
