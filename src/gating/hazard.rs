// Hazard module - empirical event rate binned by coherence score

use serde::Serialize;

use crate::error::GateError;

/// Minimum samples a bin needs before its rate is reported
pub const MIN_BIN_SAMPLES: usize = 5;

/// Per-bin event rate over `[0, 1)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardCurve {
    pub centers: Vec<f64>,
    /// `None` for bins holding fewer than `MIN_BIN_SAMPLES` samples
    pub hazard: Vec<Option<f64>>,
}

/// Fraction of samples with an event inside each of `bins` equal m_l bins
///
/// Bin `b` covers `[b / bins, (b + 1) / bins)`. Values outside `[0, 1)`,
/// including exactly `1.0`, and NaN fall into no bin.
///
/// # Errors
/// `InvalidParameter` when `bins` is zero or the two slices differ in length.
pub fn hazard_curve(m_l: &[f64], events: &[bool], bins: usize) -> Result<HazardCurve, GateError> {
    if bins == 0 {
        return Err(GateError::InvalidParameter {
            name: "bins".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if m_l.len() != events.len() {
        return Err(GateError::InvalidParameter {
            name: "events".to_string(),
            reason: format!("length {} does not match m_l length {}", events.len(), m_l.len()),
        });
    }

    let step = 1.0 / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| i as f64 * step).collect();

    let mut totals = vec![0usize; bins];
    let mut hits = vec![0usize; bins];
    for (&value, &event) in m_l.iter().zip(events) {
        let above = edges.partition_point(|&edge| edge <= value);
        if above == 0 || above > bins {
            continue;
        }
        let bin = above - 1;
        totals[bin] += 1;
        if event {
            hits[bin] += 1;
        }
    }

    Ok(HazardCurve {
        centers: edges.windows(2).map(|pair| 0.5 * (pair[0] + pair[1])).collect(),
        hazard: totals
            .iter()
            .zip(&hits)
            .map(|(&total, &hit)| (total >= MIN_BIN_SAMPLES).then(|| hit as f64 / total as f64))
            .collect(),
    })
}
