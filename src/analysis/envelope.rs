// Envelope module - analytic-signal envelopes and band energy estimation
//
// For each adjacent pair of band edges the signal is band-limited with a
// zero-phase Butterworth band-pass, its instantaneous amplitude is taken from
// the analytic signal (FFT-based Hilbert transform), and the squared envelope
// becomes that band's energy row. Rows stay at the full input sample rate so
// the tracker can compare bands sample by sample.

use rustfft::{num_complex::Complex, FftPlanner};

use super::filter::{BandPassFilter, DEFAULT_FILTER_ORDER};
use crate::error::SpectralError;

/// Instantaneous amplitude via the FFT-based analytic signal
pub struct HilbertEnvelope {
    planner: FftPlanner<f64>,
}

impl HilbertEnvelope {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Compute `|x + i * H{x}|` for the whole signal
    ///
    /// Positive-frequency bins are doubled, negative-frequency bins zeroed,
    /// and the DC (and, for even lengths, Nyquist) bin kept as is.
    pub fn envelope(&mut self, signal: &[f64]) -> Vec<f64> {
        let n = signal.len();
        if n == 0 {
            return Vec::new();
        }

        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&v| Complex::new(v, 0.0)).collect();

        let forward = self.planner.plan_fft_forward(n);
        forward.process(&mut buffer);

        let half = n / 2;
        for (k, bin) in buffer.iter_mut().enumerate().skip(1) {
            if n % 2 == 0 && k == half {
                continue;
            }
            if k <= half {
                *bin *= 2.0;
            } else {
                *bin = Complex::new(0.0, 0.0);
            }
        }

        let inverse = self.planner.plan_fft_inverse(n);
        inverse.process(&mut buffer);

        let scale = 1.0 / n as f64;
        buffer.iter().map(|c| c.norm() * scale).collect()
    }
}

impl Default for HilbertEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

/// Band-by-time energy matrix (rows = bands, columns = samples)
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMatrix {
    rows: Vec<Vec<f64>>,
    n_samples: usize,
}

impl EnergyMatrix {
    /// Build a matrix from per-band rows of equal, non-zero length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, SpectralError> {
        let n_samples = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || n_samples == 0 {
            return Err(SpectralError::EmptyEnergyMatrix);
        }
        if let Some((band, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_samples)
        {
            return Err(SpectralError::RaggedEnergyMatrix {
                band,
                expected: n_samples,
                actual: row.len(),
            });
        }
        Ok(Self { rows, n_samples })
    }

    pub fn n_bands(&self) -> usize {
        self.rows.len()
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn get(&self, band: usize, t: usize) -> f64 {
        self.rows[band][t]
    }

    /// All energies in band-major order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row.iter().copied())
    }
}

/// Filterbank energy estimator over octave band edges
pub struct BandEnergyEstimator {
    sample_rate: f64,
    filter_order: usize,
    envelope: HilbertEnvelope,
}

impl BandEnergyEstimator {
    /// Create an estimator using the default 4th-order Butterworth prototype
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(sample_rate: f64) -> Self {
        Self::with_order(sample_rate, DEFAULT_FILTER_ORDER)
    }

    pub fn with_order(sample_rate: f64, filter_order: usize) -> Self {
        Self {
            sample_rate,
            filter_order,
            envelope: HilbertEnvelope::new(),
        }
    }

    /// Squared analytic envelope of the signal band-limited to `[lo_hz, hi_hz]`
    ///
    /// The band is clamped with [`BandPassFilter::clamp_band`] before design.
    pub fn band_energy(
        &mut self,
        signal: &[f64],
        lo_hz: f64,
        hi_hz: f64,
    ) -> Result<Vec<f64>, SpectralError> {
        let filter = {
            let (lo, hi) = BandPassFilter::clamp_band(lo_hz, hi_hz, self.sample_rate);
            BandPassFilter::butterworth(self.filter_order, lo, hi, self.sample_rate)?
        };
        let band_limited = filter.filtfilt(signal)?;

        let energy: Vec<f64> = self
            .envelope
            .envelope(&band_limited)
            .into_iter()
            .map(|amplitude| amplitude * amplitude)
            .collect();

        if energy.iter().any(|e| !e.is_finite()) {
            let (lo, hi) = filter.band();
            return Err(SpectralError::FilterDesign {
                lo,
                hi,
                reason: "filter produced non-finite output".to_string(),
            });
        }
        Ok(energy)
    }

    /// Compute the energy matrix for every adjacent edge pair
    ///
    /// # Errors
    /// * `InvalidSampleRate` - sample rate is not finite and positive
    /// * `InvalidRange` - fewer than two edges (no band)
    /// * `FilterDesign` / `SignalTooShort` - from the per-band filter
    pub fn estimate(
        &mut self,
        signal: &[f64],
        edges: &[f64],
    ) -> Result<EnergyMatrix, SpectralError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(SpectralError::InvalidSampleRate {
                fs: self.sample_rate,
            });
        }
        if edges.len() < 2 {
            let fmin = edges.first().copied().unwrap_or(f64::NAN);
            return Err(SpectralError::InvalidRange { fmin, fmax: fmin });
        }

        let rows = edges
            .windows(2)
            .map(|pair| self.band_energy(signal, pair[0], pair[1]))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "[ShellTracker] Energy matrix: {} bands x {} samples",
            rows.len(),
            signal.len()
        );

        EnergyMatrix::from_rows(rows)
    }
}

/// Convenience wrapper: energy matrix for `edges` with the default filter order
pub fn filterbank_energy(
    signal: &[f64],
    sample_rate: f64,
    edges: &[f64],
) -> Result<EnergyMatrix, SpectralError> {
    BandEnergyEstimator::new(sample_rate).estimate(signal, edges)
}
