// Bands module - octave-spaced band edge construction

use crate::error::SpectralError;

/// Relative tolerance for keeping an edge that lands on `fmax` up to rounding
const EDGE_TOLERANCE: f64 = 1e-9;

/// Build octave-spaced band edges `fmin * 2^i` for `i = 0..=n_bands`
///
/// Edges above `fmax * (1 + 1e-9)` are dropped, so the result may hold
/// fewer than `n_bands + 1` edges. The range itself is not validated here:
/// `fmin > fmax` degenerates to a single edge (or none). Use
/// [`validated_band_edges`] at pipeline boundaries.
///
/// Edges grow monotonically, so generation stops at the first edge past the
/// limit; a huge `n_bands` costs no more than the octaves that fit. A
/// non-positive or non-finite `fmin` yields no edges.
pub fn octave_band_edges(fmin: f64, fmax: f64, n_bands: usize) -> Vec<f64> {
    let limit = fmax * (1.0 + EDGE_TOLERANCE);
    std::iter::successors(Some(fmin), |&edge| Some(edge * 2.0))
        .take(n_bands.saturating_add(1))
        .take_while(|&edge| edge > 0.0 && edge.is_finite() && edge <= limit)
        .collect()
}

/// Octave band edges that describe at least one band
///
/// Rejects non-finite or non-positive `fmin`, and any range that yields
/// fewer than two edges (`fmax < 2 * fmin`, `fmin > fmax` or `n_bands == 0`).
pub fn validated_band_edges(
    fmin: f64,
    fmax: f64,
    n_bands: usize,
) -> Result<Vec<f64>, SpectralError> {
    if !fmin.is_finite() || !fmax.is_finite() || fmin <= 0.0 {
        return Err(SpectralError::InvalidRange { fmin, fmax });
    }

    let edges = octave_band_edges(fmin, fmax, n_bands);
    if edges.len() < 2 {
        return Err(SpectralError::InvalidRange { fmin, fmax });
    }
    Ok(edges)
}

/// Geometric-mean center frequency of each band, `sqrt(edges[i] * edges[i+1])`
///
/// One center per band (`edges.len() - 1` values).
pub fn band_centers(edges: &[f64]) -> Vec<f64> {
    edges
        .windows(2)
        .map(|pair| (pair[0] * pair[1]).sqrt())
        .collect()
}
