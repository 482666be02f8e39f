// Coherence module - scalar descriptors and the composite coherence meter
//
// Architecture:
// - fit: least-squares line fit shared by the log-log estimators
// - welch: averaged periodogram PSD
// - metrics: Hill tail index (mu), spectral slope (gamma), DFA Hurst (H)
// - meter: normalization and weighted mean into m_l
//
// Each estimator reads the raw signal independently; absent metrics are
// `None` and drop out of the meter.

pub mod fit;
pub mod meter;
pub mod metrics;
pub mod welch;

pub use fit::{linear_fit, LineFit};
pub use meter::{compute_m_l, MeterWeights};
pub use metrics::{heavy_tail_mu_hill, hurst_dfa, spectral_slope_gamma, DfaScales};
pub use welch::{welch_psd, Psd};

use serde::Serialize;

use crate::config::CoherenceConfig;

/// Metric values and composite score for one signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoherenceSummary {
    pub mu: Option<f64>,
    pub gamma: Option<f64>,
    pub hurst: Option<f64>,
    pub m_l: f64,
}

/// Runs the three estimators and the meter with one configuration
pub struct CoherenceAnalyzer {
    sample_rate: f64,
    config: CoherenceConfig,
}

impl CoherenceAnalyzer {
    pub fn new(sample_rate: f64, config: CoherenceConfig) -> Self {
        Self {
            sample_rate,
            config,
        }
    }

    pub fn config(&self) -> &CoherenceConfig {
        &self.config
    }

    pub fn dfa_scales(&self) -> DfaScales {
        DfaScales {
            min_scale: self.config.dfa_min_scale,
            max_scale: self.config.dfa_max_scale,
            num_scales: self.config.dfa_num_scales,
        }
    }

    pub fn analyze(&self, signal: &[f64]) -> CoherenceSummary {
        let mu = heavy_tail_mu_hill(signal, self.config.hill_quantile);
        let gamma = spectral_slope_gamma(
            signal,
            self.sample_rate,
            self.config.slope_fmin,
            self.config.slope_fmax,
        );
        let hurst = hurst_dfa(signal, &self.dfa_scales());
        let m_l = compute_m_l(mu, gamma, hurst, &MeterWeights::from(self.config.weights));

        log::debug!(
            "[Coherence] n={} mu={:?} gamma={:?} H={:?} m_l={:.4}",
            signal.len(),
            mu,
            gamma,
            hurst,
            m_l
        );
        if mu.is_none() && gamma.is_none() && hurst.is_none() {
            log::warn!(
                "[Coherence] No metric computable for {} samples, m_l = 0",
                signal.len()
            );
        }

        CoherenceSummary {
            mu,
            gamma,
            hurst,
            m_l,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_white_noise_summary() {
        let mut rng = StdRng::seed_from_u64(21);
        let signal: Vec<f64> = (0..8192).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let summary = CoherenceAnalyzer::new(100.0, CoherenceConfig::default()).analyze(&signal);

        assert!(summary.mu.is_some());
        assert!(summary.gamma.is_some());
        assert!(summary.hurst.is_some());
        assert!((0.0..=1.0).contains(&summary.m_l));
    }

    #[test]
    fn test_constant_signal_scores_zero() {
        let summary =
            CoherenceAnalyzer::new(100.0, CoherenceConfig::default()).analyze(&[1.0; 2048]);
        assert_eq!(summary.mu, None);
        assert_eq!(summary.gamma, None);
        assert_eq!(summary.hurst, None);
        assert_eq!(summary.m_l, 0.0);
    }

    #[test]
    fn test_summary_serializes_absent_as_null() {
        let summary = CoherenceSummary {
            mu: None,
            gamma: Some(1.0),
            hurst: None,
            m_l: 0.5,
        };
        let json = serde_json::to_value(summary).unwrap();
        assert!(json["mu"].is_null());
        assert_eq!(json["gamma"], 1.0);
        assert_eq!(json["m_l"], 0.5);
    }
}
