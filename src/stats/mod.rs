// Stats module - bootstrap confidence intervals, FDR control, KDE modality
// and the participation ratio of a singular-value spectrum

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Evaluation points used by [`dip_proxy_kde`] callers without a preference
pub const DEFAULT_KDE_GRID: usize = 1024;

/// Fewer distinct values than this report no peaks
const MIN_UNIQUE_FOR_KDE: usize = 5;

/// Regularizer in the participation-ratio denominator
const PARTICIPATION_EPS: f64 = 1e-12;

/// Seeded generator, or an entropy-seeded one when `seed` is `None`
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Linear-interpolated quantile of an ascending slice
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Percentile bootstrap confidence interval of the mean
///
/// Draws `n_boot` resamples with replacement and returns the
/// `alpha / 2` and `1 - alpha / 2` quantiles of the resampled means.
///
/// # Returns
/// `None` for an empty sample or `n_boot == 0`.
pub fn ci_mean(samples: &[f64], alpha: f64, n_boot: usize, seed: Option<u64>) -> Option<(f64, f64)> {
    if samples.is_empty() || n_boot == 0 {
        return None;
    }

    let mut rng = make_rng(seed);
    let n = samples.len();
    let mut means: Vec<f64> = (0..n_boot)
        .map(|_| (0..n).map(|_| samples[rng.gen_range(0..n)]).sum::<f64>() / n as f64)
        .collect();
    means.sort_by(|a, b| a.total_cmp(b));

    Some((
        quantile_sorted(&means, alpha / 2.0),
        quantile_sorted(&means, 1.0 - alpha / 2.0),
    ))
}

/// Number of hypotheses rejected by the Benjamini-Hochberg procedure
///
/// The largest `k` with `p_(k) <= alpha * k / m` over the sorted p-values.
pub fn bh_fdr(pvals: &[f64], alpha: f64) -> usize {
    let mut sorted = pvals.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let m = sorted.len() as f64;

    sorted
        .iter()
        .enumerate()
        .filter(|&(i, &p)| p <= alpha * (i + 1) as f64 / m)
        .map(|(i, _)| i + 1)
        .max()
        .unwrap_or(0)
}

/// Local-maximum count of a Gaussian kernel density estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityReport {
    pub n_peaks: usize,
}

/// Crude bimodality proxy: number of strict interior maxima of a KDE
///
/// Non-finite samples are dropped. The kernel width follows Scott's rule,
/// `n^(-1/5)` times the sample standard deviation (ddof = 1), and the
/// density is evaluated on `grid` evenly spaced points from the smallest
/// to the largest sample.
///
/// # Returns
/// `n_peaks = 0` when fewer than five distinct values remain.
pub fn dip_proxy_kde(samples: &[f64], grid: usize) -> ModalityReport {
    let mut finite: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    finite.sort_by(|a, b| a.total_cmp(b));

    let mut unique = finite.clone();
    unique.dedup();
    if unique.len() < MIN_UNIQUE_FOR_KDE {
        return ModalityReport { n_peaks: 0 };
    }

    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let bandwidth = n.powf(-0.2) * var.sqrt();
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    let (lo, hi) = (finite[0], finite[finite.len() - 1]);
    let step = if grid > 1 { (hi - lo) / (grid - 1) as f64 } else { 0.0 };
    let density: Vec<f64> = (0..grid)
        .map(|i| {
            let t = lo + step * i as f64;
            finite
                .iter()
                .map(|&x| (-0.5 * ((t - x) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm
        })
        .collect();

    let n_peaks = density
        .windows(3)
        .filter(|w| w[1] > w[0] && w[1] > w[2])
        .count();
    ModalityReport { n_peaks }
}

/// Participation ratio `(sum s^2)^2 / (sum s^4 + 1e-12)` of singular values
///
/// Close to the number of equally weighted components; 1 for a rank-one
/// spectrum and 0 for an empty one.
pub fn participation_ratio(singular_values: &[f64]) -> f64 {
    let (s2, s4) = singular_values
        .iter()
        .map(|s| s * s)
        .fold((0.0, 0.0), |(s2, s4), sq| (s2 + sq, s4 + sq * sq));
    s2 * s2 / (s4 + PARTICIPATION_EPS)
}
