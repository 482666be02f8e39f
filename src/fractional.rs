//! Fractional-relaxation exponents
//!
//! Heuristic inversion of the memory exponent beta from the coherence
//! metrics, and the response exponents it predicts.

/// Weights for (gamma, 2 - mu) in `invert_beta`
pub const DEFAULT_BETA_WEIGHTS: (f64, f64) = (0.5, 0.5);

/// Estimate beta from the spectral slope and the tail index
///
/// Weighted mean of `gamma` and `max(0, 2 - mu)` over whichever inputs are
/// present and finite.
///
/// # Returns
/// `None` when neither input is usable or the used weights sum to zero.
pub fn invert_beta(mu: Option<f64>, gamma: Option<f64>, weights: (f64, f64)) -> Option<f64> {
    let terms = [
        gamma.filter(|g| g.is_finite()).map(|g| (g, weights.0)),
        mu.filter(|m| m.is_finite())
            .map(|m| ((2.0 - m).max(0.0), weights.1)),
    ];

    let (weighted, total) = terms
        .iter()
        .flatten()
        .fold((0.0, 0.0), |(sum, total), &(value, weight)| {
            (sum + value * weight, total + weight)
        });

    if total == 0.0 {
        return None;
    }
    let beta = weighted / total;
    beta.is_finite().then_some(beta)
}

/// Late-time envelope decay `t^-p` with `p = beta`
pub fn predict_tail_exponent(beta: f64) -> f64 {
    beta
}

/// Group delay `~ f^(alpha - 2)` for a fractional Laplacian of order alpha
pub fn predict_group_delay_power(alpha: f64) -> f64 {
    alpha - 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invert_beta_both_inputs() {
        let beta = invert_beta(Some(1.5), Some(1.0), DEFAULT_BETA_WEIGHTS).unwrap();
        assert!((beta - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_invert_beta_single_input() {
        assert_eq!(invert_beta(None, Some(1.2), DEFAULT_BETA_WEIGHTS), Some(1.2));
        // 2 - mu clipped at 0
        assert_eq!(invert_beta(Some(3.0), None, DEFAULT_BETA_WEIGHTS), Some(0.0));
        assert_eq!(
            invert_beta(Some(f64::NAN), Some(0.4), DEFAULT_BETA_WEIGHTS),
            Some(0.4)
        );
    }

    #[test]
    fn test_invert_beta_absent() {
        assert_eq!(invert_beta(None, None, DEFAULT_BETA_WEIGHTS), None);
        assert_eq!(invert_beta(Some(1.0), Some(1.0), (0.0, 0.0)), None);
    }

    #[test]
    fn test_response_exponents() {
        assert_eq!(predict_tail_exponent(0.7), 0.7);
        assert_eq!(predict_group_delay_power(1.5), -0.5);
    }
}
