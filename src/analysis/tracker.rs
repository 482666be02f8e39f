// Tracker module - dominant shell selection per time sample

use super::envelope::EnergyMatrix;

/// Sentinel used when a dominant index series is exported as integers
pub const NO_DOMINANT_BAND: i64 = -1;

/// Dominant band index per sample; `None` when no band clears the floor
pub type DominantIndexSeries = Vec<Option<usize>>;

/// Select the energy-dominant band for every time sample
///
/// Ties resolve to the lowest band index (first maximum in scan order).
/// With `energy_min` set, samples whose maximum energy is below the floor
/// get `None`.
pub fn dominant_shell_indices(
    energy: &EnergyMatrix,
    energy_min: Option<f64>,
) -> DominantIndexSeries {
    (0..energy.n_samples())
        .map(|t| {
            let (band, max_energy) = first_max(energy, t)?;
            match energy_min {
                Some(floor) if max_energy < floor || max_energy.is_nan() => None,
                _ => Some(band),
            }
        })
        .collect()
}

/// Stable first-occurrence argmax over the bands at sample `t`
fn first_max(energy: &EnergyMatrix, t: usize) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for band in 0..energy.n_bands() {
        let value = energy.get(band, t);
        match best {
            Some((_, current)) if value <= current || value.is_nan() => {}
            _ => best = Some((band, value)),
        }
    }
    best
}

/// Export a series with `None` mapped to [`NO_DOMINANT_BAND`]
pub fn to_sentinel_indices(series: &[Option<usize>]) -> Vec<i64> {
    series
        .iter()
        .map(|index| index.map_or(NO_DOMINANT_BAND, |band| band as i64))
        .collect()
}
