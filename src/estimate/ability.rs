//! Per-respondent ability (θ) estimation.
//!
//! Maximum-likelihood θ given fixed item parameters, via Newton-Raphson
//! on the 2PL log-likelihood:
//!
//! ```text
//! gradient    = Σ aᵢ (uᵢ - Pᵢ)
//! information = Σ aᵢ² Pᵢ (1 - Pᵢ)
//! θ ← clamp(θ + gradient / information)
//! ```
//!
//! The update is skipped (current θ kept) when information is
//! numerically zero, so a degenerate response pattern can never divide
//! by zero or push θ to a non-finite value.

use crate::domain::{CalibrationConfig, ItemParameters};
use crate::estimate::STEP_TOLERANCE;
use crate::math::{INFO_EPSILON, probability};

/// Estimate one respondent's θ from a response vector aligned with
/// `items`. `None` cells are unobserved pairs and are skipped.
///
/// Starts at θ = 0 and clamps into `config.theta_bounds` after every
/// update, including the final one. Always returns a finite value.
pub fn estimate_theta(
    responses: &[Option<f64>],
    items: &[ItemParameters],
    config: &CalibrationConfig,
) -> f64 {
    debug_assert_eq!(responses.len(), items.len());
    let (theta_min, theta_max) = config.theta_bounds;
    let mut theta = 0.0;

    for _ in 0..config.newton_iterations {
        let mut gradient = 0.0;
        let mut information = 0.0;
        for (response, item) in responses.iter().zip(items) {
            let Some(u) = *response else { continue };
            let p = probability(theta, item.discrimination, item.difficulty);
            gradient += item.discrimination * (u - p);
            information += item.discrimination * item.discrimination * p * (1.0 - p);
        }

        // Near-zero information means the likelihood is flat here (all
        // items saturated or nothing observed); treat as converged.
        if information <= INFO_EPSILON {
            break;
        }

        let step = gradient / information;
        theta = (theta + step).clamp(theta_min, theta_max);
        if step.abs() < STEP_TOLERANCE {
            break;
        }
    }

    theta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(f64, f64)]) -> Vec<ItemParameters> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| ItemParameters {
                item_id: format!("Q{:02}", i + 1),
                discrimination: a,
                difficulty: b,
                se_discrimination: f64::NAN,
                se_difficulty: f64::NAN,
            })
            .collect()
    }

    fn spread_items() -> Vec<ItemParameters> {
        items(&[(1.0, -2.0), (1.0, -1.0), (1.0, 0.0), (1.0, 1.0), (1.0, 2.0)])
    }

    #[test]
    fn all_correct_pushes_theta_above_one() {
        let config = CalibrationConfig::default();
        let responses = vec![Some(1.0); 5];
        let theta = estimate_theta(&responses, &spread_items(), &config);
        assert!(theta > 1.0, "theta = {theta}");
        assert!(theta <= 4.0);
    }

    #[test]
    fn all_incorrect_pushes_theta_below_minus_one() {
        let config = CalibrationConfig::default();
        let responses = vec![Some(0.0); 5];
        let theta = estimate_theta(&responses, &spread_items(), &config);
        assert!(theta < -1.0, "theta = {theta}");
        assert!(theta >= -4.0);
    }

    #[test]
    fn higher_raw_score_yields_strictly_higher_theta() {
        let config = CalibrationConfig::default();
        let items = spread_items();
        let mut prev = f64::NEG_INFINITY;
        for correct in 0..=5 {
            let responses: Vec<Option<f64>> = (0..5)
                .map(|i| Some(if i < correct { 1.0 } else { 0.0 }))
                .collect();
            let theta = estimate_theta(&responses, &items, &config);
            assert!(theta.is_finite());
            assert!(theta > prev, "score {correct}: {theta} <= {prev}");
            prev = theta;
        }
    }

    #[test]
    fn mixed_pattern_stays_near_the_middle() {
        // Items at b = [-1, 0, 1], a = 1; answering [1, 1, 0] should land
        // between the extremes, closer to 0 than to either clamp bound.
        let config = CalibrationConfig::default();
        let items = items(&[(1.0, -1.0), (1.0, 0.0), (1.0, 1.0)]);
        let responses = vec![Some(1.0), Some(1.0), Some(0.0)];
        let theta = estimate_theta(&responses, &items, &config);
        assert!(theta.is_finite());
        assert!((-4.0..=4.0).contains(&theta));
        assert!(theta.abs() < 2.0, "theta = {theta}");
    }

    #[test]
    fn degenerate_inputs_never_produce_non_finite_theta() {
        let config = CalibrationConfig::default();

        // Zero discrimination everywhere: information is exactly zero.
        let flat = items(&[(0.0, 0.0), (0.0, 1.0)]);
        let theta = estimate_theta(&[Some(1.0), Some(0.0)], &flat, &config);
        assert_eq!(theta, 0.0);

        // Nothing observed.
        let theta = estimate_theta(&[None, None], &spread_items()[..2], &config);
        assert_eq!(theta, 0.0);

        // Extreme parameter magnitudes.
        let wild = items(&[(100.0, -100.0), (-10.0, 100.0), (50.0, 0.0)]);
        let theta = estimate_theta(&[Some(1.0), Some(1.0), Some(0.0)], &wild, &config);
        assert!(theta.is_finite());
        assert!((-4.0..=4.0).contains(&theta));
    }
}
