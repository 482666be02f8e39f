// Nulls module - surrogate signal generators
//
// - phase_randomize: keeps the amplitude spectrum, scrambles the phases
// - time_shuffle: keeps block-local structure, scrambles block order
//
// Both are seeded so a surrogate ensemble can be regenerated exactly.

use rand::seq::SliceRandom;
use rand::Rng;
use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

use crate::stats::make_rng;

/// Default block length for `time_shuffle`
pub const DEFAULT_SHUFFLE_BLOCK: usize = 256;

/// Fourier phase-randomized surrogate of the same length
///
/// Every one-sided bin keeps its magnitude and gets a uniform random phase.
/// The DC phase (and the Nyquist phase for even lengths) is pinned to zero so
/// the output stays real.
pub fn phase_randomize(signal: &[f64], seed: Option<u64>) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let mut spectrum: Vec<Complex<f64>> =
        signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    planner.plan_fft_forward(n).process(&mut spectrum);

    let mut rng = make_rng(seed);
    let one_sided = n / 2 + 1;
    let mut surrogate = vec![Complex::new(0.0, 0.0); n];
    for k in 0..one_sided {
        let is_nyquist = n % 2 == 0 && k == n / 2;
        let phase = if k == 0 || is_nyquist {
            0.0
        } else {
            rng.gen_range(0.0..2.0 * PI)
        };
        let bin = Complex::from_polar(spectrum[k].norm(), phase);
        surrogate[k] = bin;
        if k != 0 && !is_nyquist {
            surrogate[n - k] = bin.conj();
        }
    }

    planner.plan_fft_inverse(n).process(&mut surrogate);
    let inv = 1.0 / n as f64;
    surrogate.iter().map(|c| c.re * inv).collect()
}

/// Block-shuffled surrogate of the same length
///
/// The signal is cut into consecutive blocks of `block` samples (the last
/// one may be shorter) which are concatenated in random order.
pub fn time_shuffle(signal: &[f64], block: usize, seed: Option<u64>) -> Vec<f64> {
    let mut blocks: Vec<&[f64]> = signal.chunks(block.max(1)).collect();
    blocks.shuffle(&mut make_rng(seed));
    blocks.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amplitude_spectrum(signal: &[f64]) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        FftPlanner::<f64>::new()
            .plan_fft_forward(signal.len())
            .process(&mut buffer);
        buffer.iter().map(|c| c.norm()).collect()
    }

    fn ramp_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (i as f64 * 0.37).sin() + 0.01 * (i % 7) as f64)
            .collect()
    }

    #[test]
    fn test_phase_randomize_keeps_amplitudes() {
        for n in [64, 65] {
            let signal = ramp_signal(n);
            let surrogate = phase_randomize(&signal, Some(3));
            assert_eq!(surrogate.len(), n);

            let original = amplitude_spectrum(&signal);
            let shuffled = amplitude_spectrum(&surrogate);
            for (a, b) in original.iter().zip(&shuffled) {
                assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
            }
            assert_ne!(surrogate, signal);
        }
    }

    #[test]
    fn test_phase_randomize_seeded() {
        let signal = ramp_signal(128);
        assert_eq!(
            phase_randomize(&signal, Some(11)),
            phase_randomize(&signal, Some(11))
        );
        assert!(phase_randomize(&[], Some(11)).is_empty());
    }

    #[test]
    fn test_time_shuffle_preserves_blocks() {
        let signal: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        let shuffled = time_shuffle(&signal, 256, Some(5));
        assert_eq!(shuffled.len(), signal.len());

        let mut sorted = shuffled.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(sorted, signal);

        // Each block stays contiguous and ascending
        let starts = [0.0, 256.0, 512.0, 768.0];
        let mut i = 0;
        while i < shuffled.len() {
            assert!(starts.contains(&shuffled[i]));
            let len = if shuffled[i] == 768.0 { 232 } else { 256 };
            for j in 1..len {
                assert_eq!(shuffled[i + j], shuffled[i] + j as f64);
            }
            i += len;
        }
    }

    #[test]
    fn test_time_shuffle_zero_block() {
        let signal = [1.0, 2.0, 3.0];
        let mut shuffled = time_shuffle(&signal, 0, Some(1));
        shuffled.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(shuffled, signal.to_vec());
    }
}
