// Spectral pipeline error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Spectral error code constants
///
/// Single source of truth for the numeric codes reported by the shell
/// tracker pipeline (band construction, filtering, envelope detection).
///
/// Error code range: 3001-3006
pub struct SpectralErrorCodes {}

impl SpectralErrorCodes {
    /// Frequency range produced fewer than two band edges
    pub const INVALID_RANGE: i32 = 3001;

    /// Sample rate is zero, negative or non-finite
    pub const INVALID_SAMPLE_RATE: i32 = 3002;

    /// Band-pass filter could not be designed for the clamped band
    pub const FILTER_DESIGN: i32 = 3003;

    /// Signal is too short for zero-phase filtering
    pub const SIGNAL_TOO_SHORT: i32 = 3004;

    /// Energy matrix has no bands or no time samples
    pub const EMPTY_ENERGY_MATRIX: i32 = 3005;

    /// Energy matrix rows have different lengths
    pub const RAGGED_ENERGY_MATRIX: i32 = 3006;
}

/// Log a spectral error with structured context
///
/// Fields: error code, component (ShellTracker) and message, prefixed by
/// the caller-supplied context string.
pub fn log_spectral_error(err: &SpectralError, context: &str) {
    error!(
        "Spectral error in {}: code={}, component=ShellTracker, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Spectral pipeline errors
///
/// These errors cover the band construction, band-pass filtering and
/// energy estimation stages. Estimator degeneracy in the coherence metrics
/// is not an error and is reported as `None` instead.
///
/// Error code ranges: 3001-3006
#[derive(Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// `fmin`/`fmax` yield fewer than two octave edges (no band to analyze)
    InvalidRange { fmin: f64, fmax: f64 },

    /// Sample rate must be finite and > 0
    InvalidSampleRate { fs: f64 },

    /// Filter design failed for the (clamped) band
    FilterDesign { lo: f64, hi: f64, reason: String },

    /// Zero-phase filtering needs more samples than the padding length
    SignalTooShort { required: usize, actual: usize },

    /// Energy matrix contains no bands or no samples
    EmptyEnergyMatrix,

    /// Band row length differs from the first row
    RaggedEnergyMatrix {
        band: usize,
        expected: usize,
        actual: usize,
    },
}

impl ErrorCode for SpectralError {
    fn code(&self) -> i32 {
        match self {
            SpectralError::InvalidRange { .. } => SpectralErrorCodes::INVALID_RANGE,
            SpectralError::InvalidSampleRate { .. } => SpectralErrorCodes::INVALID_SAMPLE_RATE,
            SpectralError::FilterDesign { .. } => SpectralErrorCodes::FILTER_DESIGN,
            SpectralError::SignalTooShort { .. } => SpectralErrorCodes::SIGNAL_TOO_SHORT,
            SpectralError::EmptyEnergyMatrix => SpectralErrorCodes::EMPTY_ENERGY_MATRIX,
            SpectralError::RaggedEnergyMatrix { .. } => SpectralErrorCodes::RAGGED_ENERGY_MATRIX,
        }
    }

    fn message(&self) -> String {
        match self {
            SpectralError::InvalidRange { fmin, fmax } => {
                format!(
                    "Frequency range [{}, {}] Hz yields no octave band (need fmin > 0 and fmax >= 2*fmin)",
                    fmin, fmax
                )
            }
            SpectralError::InvalidSampleRate { fs } => {
                format!("Sample rate must be finite and greater than 0 (got {})", fs)
            }
            SpectralError::FilterDesign { lo, hi, reason } => {
                format!(
                    "Band-pass design failed for [{:.6}, {:.6}] Hz: {}",
                    lo, hi, reason
                )
            }
            SpectralError::SignalTooShort { required, actual } => {
                format!(
                    "Signal too short for zero-phase filtering: need more than {} samples, got {}",
                    required, actual
                )
            }
            SpectralError::EmptyEnergyMatrix => {
                "Energy matrix has no bands or no time samples".to_string()
            }
            SpectralError::RaggedEnergyMatrix {
                band,
                expected,
                actual,
            } => {
                format!(
                    "Energy matrix band {} has {} samples, expected {}",
                    band, actual, expected
                )
            }
        }
    }
}

impl fmt::Display for SpectralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpectralError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SpectralError {}
