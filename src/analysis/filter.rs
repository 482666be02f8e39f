// Filter module - Butterworth band-pass design and zero-phase filtering
//
// The band-pass filter is designed from the analog Butterworth low-pass
// prototype:
// 1. Place the N prototype poles on the left half of the unit circle
// 2. Map each pole through the low-pass to band-pass transform
//    s -> (s^2 + w0^2) / (s * bw), giving 2N poles
// 3. Pre-warp the band edges and apply the bilinear transform
// 4. Group conjugate pole pairs into second-order sections, each with one
//    zero at z = 1 and one at z = -1
// 5. Normalize the cascade to unit gain at the band center
//
// Zero-phase filtering runs the cascade forward and backward over an
// odd-extended copy of the signal, starting each pass from the steady-state
// section states so the ends do not ring.

use rustfft::num_complex::Complex;
use std::f64::consts::PI;

use crate::error::SpectralError;

/// Butterworth prototype order used by the band energy estimator
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Sample rate used for the bilinear transform of normalized frequencies
const BILINEAR_FS: f64 = 2.0;

/// Second-order section with `a[0] == 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b: [f64; 3],
    pub a: [f64; 3],
}

impl Biquad {
    /// DC gain `sum(b) / sum(a)`
    fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (self.a[0] + self.a[1] + self.a[2])
    }

    /// Steady-state transposed direct form II state for a unit step input
    fn step_state(&self) -> [f64; 2] {
        let y = self.dc_gain();
        let z2 = self.b[2] - self.a[2] * y;
        let z1 = self.b[1] - self.a[1] * y + z2;
        [z1, z2]
    }

    /// Complex frequency response at digital angular frequency `omega`
    fn response(&self, omega: f64) -> Complex<f64> {
        let z1 = Complex::from_polar(1.0, -omega);
        let z2 = z1 * z1;
        let num = self.b[0] + z1 * self.b[1] + z2 * self.b[2];
        let den = self.a[0] + z1 * self.a[1] + z2 * self.a[2];
        num / den
    }

    /// Run the section over `data` in transposed direct form II
    fn process(&self, data: &mut [f64], mut state: [f64; 2]) {
        let [b0, b1, b2] = self.b;
        let [_, a1, a2] = self.a;
        for sample in data.iter_mut() {
            let x = *sample;
            let y = b0 * x + state[0];
            state[0] = b1 * x - a1 * y + state[1];
            state[1] = b2 * x - a2 * y;
            *sample = y;
        }
    }
}

/// Butterworth band-pass filter as a cascade of second-order sections
#[derive(Debug, Clone)]
pub struct BandPassFilter {
    sections: Vec<Biquad>,
    order: usize,
    lo_hz: f64,
    hi_hz: f64,
}

impl BandPassFilter {
    /// Clamp a requested band into a range the design can handle
    ///
    /// `lo` is held to `[1e-6, 0.99 * nyquist]` and `hi` to
    /// `[1.01 * lo, 0.999 * nyquist]`.
    pub fn clamp_band(lo_hz: f64, hi_hz: f64, sample_rate: f64) -> (f64, f64) {
        let nyquist = sample_rate / 2.0;
        let lo = lo_hz.min(nyquist * 0.99).max(1e-6);
        let hi = hi_hz.min(nyquist * 0.999).max(lo * 1.01);
        (lo, hi)
    }

    /// Design an order-`order` Butterworth band-pass for `[lo_hz, hi_hz]`
    ///
    /// The resulting digital filter has order `2 * order` (one section per
    /// prototype pole). Edges must satisfy `0 < lo < hi < fs / 2`.
    pub fn butterworth(
        order: usize,
        lo_hz: f64,
        hi_hz: f64,
        sample_rate: f64,
    ) -> Result<Self, SpectralError> {
        let design_error = |reason: &str| SpectralError::FilterDesign {
            lo: lo_hz,
            hi: hi_hz,
            reason: reason.to_string(),
        };

        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(SpectralError::InvalidSampleRate { fs: sample_rate });
        }
        if order == 0 {
            return Err(design_error("filter order must be at least 1"));
        }

        let nyquist = sample_rate / 2.0;
        let wl = lo_hz / nyquist;
        let wh = hi_hz / nyquist;
        if !(wl.is_finite() && wh.is_finite() && wl > 0.0 && wl < wh && wh < 1.0) {
            return Err(design_error(
                "normalized edges must satisfy 0 < lo < hi < 1 (relative to Nyquist)",
            ));
        }

        // Pre-warped analog edges
        let warped_lo = 2.0 * BILINEAR_FS * (PI * wl / BILINEAR_FS).tan();
        let warped_hi = 2.0 * BILINEAR_FS * (PI * wh / BILINEAR_FS).tan();
        let bandwidth = warped_hi - warped_lo;
        let center_sq = warped_lo * warped_hi;

        let mut sections = Vec::with_capacity(order);
        for k in 0..order {
            let angle = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            let prototype = Complex::from_polar(1.0, angle);

            // Each conjugate prototype pair is handled once, from its upper member
            if prototype.im < -1e-12 {
                continue;
            }

            let half = prototype * (bandwidth / 2.0);
            let root = (half * half - center_sq).sqrt();
            let s1 = half + root;
            let s2 = half - root;

            if prototype.im > 1e-12 {
                sections.push(section_from_poles(bilinear(s1), bilinear(s1).conj()));
                sections.push(section_from_poles(bilinear(s2), bilinear(s2).conj()));
            } else {
                sections.push(section_from_poles(bilinear(s1), bilinear(s2)));
            }
        }

        for section in &sections {
            let [_, a1, a2] = section.a;
            // Schur-Cohn stability triangle for a monic quadratic
            if !(a2.abs() < 1.0 && a1.abs() < 1.0 + a2) {
                return Err(design_error("designed filter has a pole outside the unit circle"));
            }
        }

        let center_omega = 2.0 * (center_sq.sqrt() / (2.0 * BILINEAR_FS)).atan();
        let gain = sections
            .iter()
            .fold(Complex::new(1.0, 0.0), |acc, section| {
                acc * section.response(center_omega)
            })
            .norm();
        if !gain.is_finite() || gain <= f64::EPSILON {
            return Err(design_error("band-center gain is zero or non-finite"));
        }
        if let Some(first) = sections.first_mut() {
            for coeff in first.b.iter_mut() {
                *coeff /= gain;
            }
        }

        Ok(Self {
            sections,
            order,
            lo_hz,
            hi_hz,
        })
    }

    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn band(&self) -> (f64, f64) {
        (self.lo_hz, self.hi_hz)
    }

    /// Number of samples reflected onto each end before zero-phase filtering
    ///
    /// Three times the length of the equivalent transfer-function
    /// coefficient vectors (`2 * order + 1`).
    pub fn pad_len(&self) -> usize {
        3 * (2 * self.order + 1)
    }

    /// Zero-phase forward-backward filtering
    ///
    /// # Errors
    /// `SignalTooShort` if the signal is not longer than [`Self::pad_len`].
    pub fn filtfilt(&self, signal: &[f64]) -> Result<Vec<f64>, SpectralError> {
        let pad = self.pad_len();
        let n = signal.len();
        if n <= pad {
            return Err(SpectralError::SignalTooShort {
                required: pad,
                actual: n,
            });
        }

        let mut extended = odd_extension(signal, pad);
        let step_states = self.step_states();

        let x0 = extended[0];
        self.process_with_states(&mut extended, &step_states, x0);

        extended.reverse();
        let y0 = extended[0];
        self.process_with_states(&mut extended, &step_states, y0);
        extended.reverse();

        Ok(extended[pad..pad + n].to_vec())
    }

    /// Steady-state section states for a unit step applied to the cascade
    fn step_states(&self) -> Vec<[f64; 2]> {
        let mut scale = 1.0;
        self.sections
            .iter()
            .map(|section| {
                let [z1, z2] = section.step_state();
                let state = [z1 * scale, z2 * scale];
                scale *= section.dc_gain();
                state
            })
            .collect()
    }

    fn process_with_states(&self, data: &mut [f64], step_states: &[[f64; 2]], level: f64) {
        for (section, state) in self.sections.iter().zip(step_states) {
            section.process(data, [state[0] * level, state[1] * level]);
        }
    }
}

/// Bilinear transform of an analog pole
fn bilinear(pole: Complex<f64>) -> Complex<f64> {
    let two_fs = 2.0 * BILINEAR_FS;
    (two_fs + pole) / (two_fs - pole)
}

/// Monic section with the given pole pair and zeros at z = 1 and z = -1
fn section_from_poles(p1: Complex<f64>, p2: Complex<f64>) -> Biquad {
    Biquad {
        b: [1.0, 0.0, -1.0],
        a: [1.0, -(p1 + p2).re, (p1 * p2).re],
    }
}

/// Point-reflect `pad` samples about each end of the signal
fn odd_extension(signal: &[f64], pad: usize) -> Vec<f64> {
    let n = signal.len();
    let first = signal[0];
    let last = signal[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * pad);
    extended.extend((1..=pad).rev().map(|i| 2.0 * first - signal[i]));
    extended.extend_from_slice(signal);
    extended.extend((1..=pad).map(|i| 2.0 * last - signal[n - 1 - i]));
    extended
}
