// Welch module - averaged periodogram power spectral density
//
// Segments of `nperseg` samples with 50% overlap are mean-removed, weighted
// with a periodic Hann window, transformed, and their one-sided density
// spectra averaged.

use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// One-sided power spectral density estimate
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Psd {
    /// Bin frequencies in Hz (`k * fs / nperseg`)
    pub frequencies: Vec<f64>,
    /// Power density per bin (units^2 / Hz)
    pub power: Vec<f64>,
}

/// Segment length used by the spectral-slope estimator:
/// `min(4096, max(256, floor(2 * fs)))`
pub fn default_segment_len(sample_rate: f64) -> usize {
    let two_seconds = (sample_rate * 2.0).max(0.0) as usize;
    two_seconds.clamp(256, 4096)
}

/// Periodic Hann window of length `n`
fn periodic_hann(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// Welch PSD with 50% overlap, constant detrend and density scaling
///
/// Segments longer than the signal are shortened to the signal length.
/// Returns an empty estimate for an empty signal or zero segment length.
pub fn welch_psd(signal: &[f64], sample_rate: f64, nperseg: usize) -> Psd {
    if signal.is_empty() || nperseg == 0 {
        return Psd::default();
    }

    let nperseg = nperseg.min(signal.len());
    let step = nperseg - nperseg / 2;
    let window = periodic_hann(nperseg);
    let window_power: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (sample_rate * window_power);
    let n_freq = nperseg / 2 + 1;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);

    let mut accum = vec![0.0; n_freq];
    let mut segments = 0usize;
    let mut start = 0usize;
    while start + nperseg <= signal.len() {
        let segment = &signal[start..start + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;

        let mut buffer: Vec<Complex<f64>> = segment
            .iter()
            .zip(&window)
            .map(|(&x, &w)| Complex::new((x - mean) * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        for (k, (acc, bin)) in accum.iter_mut().zip(&buffer).enumerate() {
            let mut density = bin.norm_sqr() * scale;
            let is_nyquist = nperseg % 2 == 0 && k == nperseg / 2;
            if k != 0 && !is_nyquist {
                density *= 2.0;
            }
            *acc += density;
        }

        segments += 1;
        start += step;
    }

    let inv = 1.0 / segments as f64;
    Psd {
        frequencies: (0..n_freq)
            .map(|k| k as f64 * sample_rate / nperseg as f64)
            .collect(),
        power: accum.into_iter().map(|p| p * inv).collect(),
    }
}
