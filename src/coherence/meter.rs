// Meter module - composite coherence score m_l
//
// Each metric is mapped onto [0, 1] by a fixed heuristic:
// - mu (tail index): clip((2 - (mu - 1)) / 2), heavier tail scores higher
// - gamma (spectral slope): clip(gamma / 2)
// - H (Hurst): clip((H - 0.5) / 0.5), long memory scores higher
//
// The score is the weighted mean over the metrics that are present, with the
// weights renormalized by the sum actually used.

use serde::{Deserialize, Serialize};

/// Weights for the three normalized metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterWeights {
    pub mu: f64,
    pub gamma: f64,
    pub hurst: f64,
}

impl Default for MeterWeights {
    fn default() -> Self {
        Self {
            mu: 0.33,
            gamma: 0.33,
            hurst: 0.34,
        }
    }
}

impl From<[f64; 3]> for MeterWeights {
    fn from(weights: [f64; 3]) -> Self {
        Self {
            mu: weights[0],
            gamma: weights[1],
            hurst: weights[2],
        }
    }
}

fn clip_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub fn normalize_mu(mu: f64) -> f64 {
    clip_unit((2.0 - (mu - 1.0)) / 2.0)
}

pub fn normalize_gamma(gamma: f64) -> f64 {
    clip_unit(gamma / 2.0)
}

pub fn normalize_hurst(hurst: f64) -> f64 {
    clip_unit((hurst - 0.5) / 0.5)
}

/// Composite coherence score in `[0, 1]`
///
/// A metric that is `None` or non-finite is absent and its weight is dropped
/// from the normalization. Returns exactly `0.0` when nothing contributes.
pub fn compute_m_l(
    mu: Option<f64>,
    gamma: Option<f64>,
    hurst: Option<f64>,
    weights: &MeterWeights,
) -> f64 {
    let terms = [
        (mu, weights.mu, normalize_mu as fn(f64) -> f64),
        (gamma, weights.gamma, normalize_gamma),
        (hurst, weights.hurst, normalize_hurst),
    ];

    let (weighted, used) = terms
        .iter()
        .filter_map(|&(value, weight, normalize)| {
            value
                .filter(|v| v.is_finite())
                .map(|v| (weight * normalize(v), weight))
        })
        .fold((0.0, 0.0), |(sum, total), (term, weight)| {
            (sum + term, total + weight)
        });

    if used <= 0.0 || !used.is_finite() {
        return 0.0;
    }
    clip_unit(weighted / used)
}
