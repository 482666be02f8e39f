//! Configuration management for analysis parameters
//!
//! This module provides runtime configuration loading from JSON files,
//! so band layouts, debounce windows, estimator settings and meter weights
//! can be adjusted per dataset without recompilation.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete analysis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub shell_tracker: ShellTrackerConfig,
    pub coherence: CoherenceConfig,
    pub gate: GateConfig,
}

/// Octave-band shell tracker parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellTrackerConfig {
    /// Number of octave bands requested (edges may be truncated at fmax)
    pub n_bands: usize,
    /// Samples whose strongest band is below this energy get no dominant band
    pub energy_min: Option<f64>,
    /// Minimum samples between two recorded shell jumps
    pub min_gap: usize,
    /// Butterworth prototype order (band-pass order is twice this)
    pub filter_order: usize,
}

impl Default for ShellTrackerConfig {
    fn default() -> Self {
        Self {
            n_bands: 8,
            energy_min: None,
            min_gap: 1,
            filter_order: 4,
        }
    }
}

/// Coherence metric estimator settings and meter weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceConfig {
    /// Quantile above which absolute increments form the Hill tail
    pub hill_quantile: f64,
    /// Lower frequency bound of the spectral-slope fit (Hz)
    pub slope_fmin: f64,
    /// Upper frequency bound of the fit; `None` means 0.95 * Nyquist
    pub slope_fmax: Option<f64>,
    pub dfa_min_scale: usize,
    pub dfa_max_scale: usize,
    pub dfa_num_scales: usize,
    /// Weights for (mu, gamma, H)
    pub weights: [f64; 3],
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        Self {
            hill_quantile: 0.95,
            slope_fmin: 0.5,
            slope_fmax: None,
            dfa_min_scale: 8,
            dfa_max_scale: 512,
            dfa_num_scales: 12,
            weights: [0.33, 0.33, 0.34],
        }
    }
}

/// Coherence meter thresholds used by the activation gate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Lower threshold: mode activation requires m_l > m1
    pub m1: f64,
    /// Upper threshold separating intermediate from high coherence
    pub m2: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { m1: 0.33, m2: 0.66 }
    }
}

impl AnalysisConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// Loaded configuration, or the defaults if the file is missing or its
    /// JSON is invalid (a warning is logged in both cases)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match Self::load_strict(&path) {
            Ok(config) => {
                log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                config
            }
            Err(err) => {
                log::warn!(
                    "[Config] Failed to load {:?}: {:#}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from JSON file, failing on read or parse errors
    pub fn load_strict<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.as_ref().display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.as_ref().display()))
    }
}
