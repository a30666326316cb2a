//! 2PL item response function.
//!
//! The probability of a correct response under the two-parameter
//! logistic model is:
//!
//! ```text
//! P(θ, a, b) = 1 / (1 + exp(-a·(θ - b)))
//! ```
//!
//! This function sits in the innermost loop of every estimator, so it
//! must be finite and non-NaN for *any* finite inputs, including
//! pathological magnitudes (|a| beyond 100, |θ-b| beyond 100). We guard
//! the exponent explicitly instead of relying on `exp` saturation.

/// Exponent magnitude beyond which the logistic is saturated.
///
/// `exp(35) ≈ 1.6e15`, so `1/(1+exp(±35))` is already indistinguishable
/// from 0 or 1 at f64 precision a long way before `exp` itself overflows.
pub const EXP_GUARD: f64 = 35.0;

/// Information below this is treated as numerically zero: Newton steps
/// are skipped and standard errors become NaN instead of dividing by it.
pub const INFO_EPSILON: f64 = 1e-10;

/// Probability of a correct response under the 2PL model.
///
/// Guarantees for finite inputs:
/// - always finite, never NaN
/// - `a = 0` yields exactly 0.5 for every θ
/// - `a > 0` is strictly increasing in θ; `a < 0` inverts the curve
pub fn probability(theta: f64, a: f64, b: f64) -> f64 {
    let z = a * (theta - b);
    if z > EXP_GUARD {
        1.0
    } else if z < -EXP_GUARD {
        0.0
    } else {
        1.0 / (1.0 + (-z).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_is_in_unit_interval_and_increasing_for_positive_a() {
        let a = 1.3;
        let b = -0.4;
        let mut prev = probability(-6.0, a, b);
        assert!(prev > 0.0 && prev < 1.0);
        for i in 1..=120 {
            let theta = -6.0 + i as f64 * 0.1;
            let p = probability(theta, a, b);
            assert!(p > 0.0 && p < 1.0);
            assert!(p > prev, "not increasing at theta={theta}");
            prev = p;
        }
    }

    #[test]
    fn zero_discrimination_is_exactly_one_half() {
        for theta in [-4.0, -1.0, 0.0, 2.5, 4.0] {
            for b in [-4.0, 0.0, 4.0] {
                assert_eq!(probability(theta, 0.0, b), 0.5);
            }
        }
    }

    #[test]
    fn negative_discrimination_inverts_the_curve() {
        for t in [0.5, 1.0, 3.0] {
            for b in [-2.0, 0.0, 2.0] {
                let hi = probability(t, -1.5, b);
                let lo = probability(-t, -1.5, b);
                assert!(hi.is_finite() && lo.is_finite());
                assert!(hi < lo, "P({t}) should be below P({})", -t);
            }
        }
    }

    #[test]
    fn probability_is_finite_for_extreme_magnitudes() {
        for a in [-10.0, -1.0, 0.0, 1.0, 50.0, 100.0] {
            for b in [-100.0, -4.0, 0.0, 4.0, 100.0] {
                for theta in [-10.0, -4.0, 0.0, 4.0, 10.0] {
                    let p = probability(theta, a, b);
                    assert!(p.is_finite(), "P({theta}, {a}, {b}) = {p}");
                    assert!((0.0..=1.0).contains(&p));
                }
            }
        }
    }

    #[test]
    fn saturation_hits_exact_bounds() {
        assert_eq!(probability(100.0, 2.0, 0.0), 1.0);
        assert_eq!(probability(-100.0, 2.0, 0.0), 0.0);
    }
}
