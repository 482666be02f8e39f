// Analysis module - octave-band dominant-shell tracking pipeline
//
// This module orchestrates the shell tracker, turning one sampled signal
// into a sparse list of dominant-shell jumps.
//
// Architecture:
// - bands: octave-spaced band edges bounded by [fmin, fmax]
// - filter: zero-phase Butterworth band-pass (second-order sections)
// - envelope: analytic envelope and BandEnergyEstimator (bands x samples)
// - tracker: per-sample dominant band with optional energy floor
// - jumps: debounced shell-jump detection with log2 center ratio
//
// Pipeline: edges → energy matrix → dominant index series → jumps.
// Every stage is a pure batch transform over the whole input.

pub mod bands;
pub mod envelope;
pub mod filter;
pub mod jumps;
pub mod tracker;

pub use bands::{band_centers, octave_band_edges, validated_band_edges};
pub use envelope::{filterbank_energy, BandEnergyEstimator, EnergyMatrix, HilbertEnvelope};
pub use filter::BandPassFilter;
pub use jumps::{ShellJump, ShellJumpDetector};
pub use tracker::{dominant_shell_indices, to_sentinel_indices, DominantIndexSeries};

use serde::Serialize;

use crate::config::ShellTrackerConfig;
use crate::error::{log_spectral_error, SpectralError};

/// Serializable output of the shell-jump pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellJumpReport {
    /// Band edges actually used (may be fewer than `n_bands + 1`)
    pub edges: Vec<f64>,
    /// Recorded jumps, serialized as `[t, from, to, delta_log2]`
    pub jumps: Vec<ShellJump>,
}

/// Every intermediate product of one tracker run
#[derive(Debug, Clone)]
pub struct ShellTrace {
    pub edges: Vec<f64>,
    pub energy: EnergyMatrix,
    pub dominant: DominantIndexSeries,
    pub jumps: Vec<ShellJump>,
}

impl ShellTrace {
    pub fn into_report(self) -> ShellJumpReport {
        ShellJumpReport {
            edges: self.edges,
            jumps: self.jumps,
        }
    }
}

/// ShellTracker coordinates the band energy → dominant shell → jump pipeline
pub struct ShellTracker {
    estimator: BandEnergyEstimator,
    config: ShellTrackerConfig,
}

impl ShellTracker {
    /// Create a tracker for signals sampled at `sample_rate` Hz
    pub fn new(sample_rate: f64, config: ShellTrackerConfig) -> Self {
        Self {
            estimator: BandEnergyEstimator::with_order(sample_rate, config.filter_order),
            config,
        }
    }

    pub fn config(&self) -> &ShellTrackerConfig {
        &self.config
    }

    /// Run the full pipeline over `[fmin, fmax]`
    ///
    /// # Errors
    /// `InvalidRange` when the range yields no band, plus any filter or
    /// sample-rate error from the band energy estimator.
    pub fn track(
        &mut self,
        signal: &[f64],
        fmin: f64,
        fmax: f64,
    ) -> Result<ShellTrace, SpectralError> {
        let edges = validated_band_edges(fmin, fmax, self.config.n_bands)?;
        let energy = self.estimator.estimate(signal, &edges)?;
        let dominant = dominant_shell_indices(&energy, self.config.energy_min);
        let jumps = ShellJumpDetector::new(self.config.min_gap).detect(&dominant, &edges);

        log::debug!(
            "[ShellTracker] {} samples, {} bands, {} jumps (min_gap={})",
            signal.len(),
            energy.n_bands(),
            jumps.len(),
            self.config.min_gap
        );

        Ok(ShellTrace {
            edges,
            energy,
            dominant,
            jumps,
        })
    }
}

/// Detect dominant-shell jumps in one signal
///
/// # Arguments
/// * `signal` - Sampled signal
/// * `sample_rate` - Sample rate in Hz
/// * `fmin` / `fmax` - Octave band range in Hz
/// * `config` - Band count, energy floor, debounce gap and filter order
///
/// # Returns
/// The band edges used and the recorded jumps
pub fn detect_shell_jumps_series(
    signal: &[f64],
    sample_rate: f64,
    fmin: f64,
    fmax: f64,
    config: &ShellTrackerConfig,
) -> Result<ShellJumpReport, SpectralError> {
    ShellTracker::new(sample_rate, config.clone())
        .track(signal, fmin, fmax)
        .map(ShellTrace::into_report)
        .map_err(|err| {
            log_spectral_error(&err, "detect_shell_jumps_series");
            err
        })
}

#[cfg(test)]
mod tests;
