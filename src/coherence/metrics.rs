// Metrics module - scalar coherence estimators
//
// Three independent estimators, each reading the raw signal:
// - heavy_tail_mu_hill: Hill tail index of absolute first differences
// - spectral_slope_gamma: 1/f^gamma exponent from a log-log fit of Welch PSD
// - hurst_dfa: Hurst exponent from order-1 detrended fluctuation analysis
//
// Degenerate input yields `None` ("metric absent"), never an error.

use super::fit::linear_fit;
use super::welch::{default_segment_len, welch_psd};

/// Stabilizer added to the mean log ratio so an all-equal tail stays finite
pub const HILL_EPSILON: f64 = 1e-12;

/// Minimum number of nonzero increments for the Hill estimator
pub const HILL_MIN_INCREMENTS: usize = 10;

/// Minimum tail size for the Hill estimator
pub const HILL_MIN_TAIL: usize = 5;

/// Smallest DFA window length considered
pub const DFA_MIN_WINDOW: usize = 4;

/// Hill tail-index estimate on absolute first differences
///
/// The `k = max(5, floor(n * (1 - q)))` largest increments form the tail and
/// the next order statistic is the threshold `xmin`:
/// `mu = 1 / (mean(ln(top / xmin)) + 1e-12)`.
///
/// # Returns
/// `None` when fewer than 10 nonzero increments exist or the tail is
/// degenerate (non-positive values).
pub fn heavy_tail_mu_hill(signal: &[f64], quantile: f64) -> Option<f64> {
    let mut increments: Vec<f64> = signal
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .filter(|&a| a > 0.0)
        .collect();

    if increments.len() < HILL_MIN_INCREMENTS {
        return None;
    }

    let n = increments.len();
    let k = ((n as f64 * (1.0 - quantile)) as usize).max(HILL_MIN_TAIL).min(n);

    increments.sort_by(|a, b| b.total_cmp(a));
    let top = &increments[..k];
    let xmin = if k < n { increments[k] } else { increments[n - 1] };

    if xmin <= 0.0 || top.iter().any(|&v| v <= 0.0) {
        return None;
    }

    let mean_log = top.iter().map(|&v| (v / xmin).ln()).sum::<f64>() / k as f64;
    let mu = 1.0 / (mean_log + HILL_EPSILON);
    mu.is_finite().then_some(mu)
}

/// Spectral slope `gamma` of `P(f) ~ f^-gamma`
///
/// Welch PSD (segment length `min(4096, max(256, 2 * fs))`) restricted to
/// `[fmin, fmax]` with positive power, fitted as
/// `log10 P = c - gamma * log10 f`. `fmax` defaults to `0.95 * fs / 2`.
///
/// # Returns
/// `None` when fewer than two bins qualify or the fit is degenerate.
pub fn spectral_slope_gamma(
    signal: &[f64],
    sample_rate: f64,
    fmin: f64,
    fmax: Option<f64>,
) -> Option<f64> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return None;
    }
    let fmax = fmax.unwrap_or(sample_rate / 2.0 * 0.95);

    let psd = welch_psd(signal, sample_rate, default_segment_len(sample_rate));
    let (log_f, log_p): (Vec<f64>, Vec<f64>) = psd
        .frequencies
        .iter()
        .zip(&psd.power)
        .filter(|&(&f, &p)| f >= fmin && f <= fmax && f > 0.0 && p > 0.0)
        .map(|(&f, &p)| (f.log10(), p.log10()))
        .unzip();

    linear_fit(&log_f, &log_p).map(|fit| -fit.slope)
}

/// Log-spaced DFA window lengths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DfaScales {
    pub min_scale: usize,
    pub max_scale: usize,
    pub num_scales: usize,
}

impl Default for DfaScales {
    fn default() -> Self {
        Self {
            min_scale: 8,
            max_scale: 512,
            num_scales: 12,
        }
    }
}

impl DfaScales {
    /// `num_scales` log-spaced lengths rounded to integers, sorted and deduplicated
    pub fn lengths(&self) -> Vec<usize> {
        let lo = (self.min_scale.max(1) as f64).log10();
        let hi = (self.max_scale.max(1) as f64).log10();
        let mut lengths: Vec<usize> = match self.num_scales {
            0 => Vec::new(),
            1 => vec![self.min_scale],
            count => (0..count)
                .map(|i| {
                    let exponent = lo + (hi - lo) * i as f64 / (count - 1) as f64;
                    // Rounded, not truncated: numpy's logspace(..).astype(int)
                    // truncates 10^log10(8) = 7.999.. to 7, here it stays 8
                    10f64.powf(exponent).round() as usize
                })
                .collect(),
        };
        lengths.sort_unstable();
        lengths.dedup();
        lengths
    }
}

/// Root-mean-square residual of per-window linear detrending
///
/// The profile is cut into `profile.len() / window` non-overlapping windows;
/// the tail that does not fill a window is dropped.
fn detrended_fluctuation(profile: &[f64], window: usize) -> f64 {
    let segments = profile.len() / window;
    let t_mean = (window - 1) as f64 / 2.0;
    let t_var: f64 = (0..window).map(|t| (t as f64 - t_mean).powi(2)).sum();

    let mut residual_sq = 0.0;
    for segment in profile.chunks_exact(window).take(segments) {
        let y_mean = segment.iter().sum::<f64>() / window as f64;
        let cov: f64 = segment
            .iter()
            .enumerate()
            .map(|(t, &y)| (t as f64 - t_mean) * (y - y_mean))
            .sum();
        let slope = cov / t_var;
        residual_sq += segment
            .iter()
            .enumerate()
            .map(|(t, &y)| {
                let trend = y_mean + slope * (t as f64 - t_mean);
                (y - trend).powi(2)
            })
            .sum::<f64>();
    }

    (residual_sq / (segments * window) as f64).sqrt()
}

/// Hurst exponent via order-1 detrended fluctuation analysis
///
/// The mean-removed signal is integrated, the RMS detrended fluctuation
/// `F(s)` is evaluated at every scale with `4 <= s < n`, and `H` is the
/// slope of `log10 F` against `log10 s`.
///
/// # Returns
/// `None` when fewer than two scales give a positive fluctuation.
pub fn hurst_dfa(signal: &[f64], scales: &DfaScales) -> Option<f64> {
    let n = signal.len();
    if n == 0 {
        return None;
    }

    let mean = signal.iter().sum::<f64>() / n as f64;
    let profile: Vec<f64> = signal
        .iter()
        .scan(0.0, |acc, &x| {
            *acc += x - mean;
            Some(*acc)
        })
        .collect();

    let (log_s, log_f): (Vec<f64>, Vec<f64>) = scales
        .lengths()
        .into_iter()
        .filter(|&s| s >= DFA_MIN_WINDOW && s < n)
        .filter_map(|s| {
            let fluctuation = detrended_fluctuation(&profile, s);
            (fluctuation > 0.0 && fluctuation.is_finite())
                .then(|| ((s as f64).log10(), fluctuation.log10()))
        })
        .unzip();

    linear_fit(&log_s, &log_f).map(|fit| fit.slope)
}
