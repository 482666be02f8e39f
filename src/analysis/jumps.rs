// Jumps module - debounced shell-jump detection over a dominant index series
//
// State: (last valid band, sample of the last recorded jump), seeded from the
// first entry and t = 0. At each later sample a jump is recorded when the
// current band is valid, differs from the last valid band, and at least
// `min_gap` samples have passed since the last recorded jump. Every valid
// sample updates the last valid band whether or not it fired, so changes
// inside the debounce window are absorbed silently. Samples without a
// dominant band are transparent.

use serde::ser::{Serialize, SerializeTuple, Serializer};

use super::bands::band_centers;

/// A change of dominant shell
///
/// Serialized as the tuple `[t, from, to, delta_log2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellJump {
    /// Sample index where the new band first qualified
    pub t: usize,
    /// Previous dominant band
    pub from: usize,
    /// New dominant band
    pub to: usize,
    /// `log2(center[to] / center[from])`, rounded to 3 decimals
    pub delta_log2: f64,
}

impl Serialize for ShellJump {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(4)?;
        tuple.serialize_element(&self.t)?;
        tuple.serialize_element(&self.from)?;
        tuple.serialize_element(&self.to)?;
        tuple.serialize_element(&self.delta_log2)?;
        tuple.end()
    }
}

/// Debounced detector of dominant-shell transitions
#[derive(Debug, Clone, Copy)]
pub struct ShellJumpDetector {
    min_gap: usize,
}

impl ShellJumpDetector {
    /// # Arguments
    /// * `min_gap` - Minimum samples between two recorded jumps
    pub fn new(min_gap: usize) -> Self {
        Self { min_gap }
    }

    pub fn min_gap(&self) -> usize {
        self.min_gap
    }

    /// Scan the series and return the recorded jumps in time order
    ///
    /// `edges` are the band edges the series was computed against; band `i`
    /// has center `sqrt(edges[i] * edges[i + 1])`. Indices with no center
    /// (beyond the last band) are treated like samples with no dominant band.
    pub fn detect(&self, dominant: &[Option<usize>], edges: &[f64]) -> Vec<ShellJump> {
        let centers = band_centers(edges);
        let valid = |index: Option<usize>| index.filter(|&band| band < centers.len());

        let mut jumps = Vec::new();
        let Some(&first) = dominant.first() else {
            return jumps;
        };

        let mut last_valid = valid(first);
        let mut last_jump_t = 0usize;

        for (t, &index) in dominant.iter().enumerate().skip(1) {
            let current = valid(index);
            if let (Some(to), Some(from)) = (current, last_valid) {
                if to != from && t - last_jump_t >= self.min_gap {
                    jumps.push(ShellJump {
                        t,
                        from,
                        to,
                        delta_log2: round_to_millis((centers[to] / centers[from]).log2()),
                    });
                    last_jump_t = t;
                }
            }
            if current.is_some() {
                last_valid = current;
            }
        }

        jumps
    }
}

impl Default for ShellJumpDetector {
    fn default() -> Self {
        Self::new(1)
    }
}

fn round_to_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [f64; 5] = [8.0, 16.0, 32.0, 64.0, 128.0];

    fn series(values: &[i64]) -> Vec<Option<usize>> {
        values
            .iter()
            .map(|&v| if v >= 0 { Some(v as usize) } else { None })
            .collect()
    }

    #[test]
    fn test_single_octave_jump() {
        let dom = series(&[1, 1, 1, 2, 2]);
        let jumps = ShellJumpDetector::new(1).detect(&dom, &EDGES);
        assert_eq!(
            jumps,
            vec![ShellJump {
                t: 3,
                from: 1,
                to: 2,
                delta_log2: 1.0
            }]
        );
    }

    #[test]
    fn test_debounce_reduces_jumps() {
        let dom = series(&[0, 0, 1, 1, 0, 0, 1, 1]);
        let loose = ShellJumpDetector::new(1).detect(&dom, &EDGES);
        let strict = ShellJumpDetector::new(3).detect(&dom, &EDGES);

        assert_eq!(loose.len(), 3);
        assert!(strict.len() < loose.len());
        for pair in strict.windows(2) {
            assert!(pair[1].t - pair[0].t >= 3);
        }
        assert_eq!(strict.len(), 1);
        assert_eq!((strict[0].t, strict[0].from, strict[0].to), (4, 1, 0));
    }

    #[test]
    fn test_sentinels_are_transparent() {
        let dom = series(&[0, 0, -1, -1, -1, 3, 3]);
        let jumps = ShellJumpDetector::new(1).detect(&dom, &EDGES);
        assert_eq!(jumps.len(), 1);
        assert_eq!((jumps[0].t, jumps[0].from, jumps[0].to), (5, 0, 3));
        assert_eq!(jumps[0].delta_log2, 3.0);
    }

    #[test]
    fn test_leading_sentinel_waits_for_valid_band() {
        let dom = series(&[-1, -1, 2, 1]);
        let jumps = ShellJumpDetector::new(1).detect(&dom, &EDGES);
        assert_eq!(jumps.len(), 1);
        assert_eq!((jumps[0].t, jumps[0].from, jumps[0].to), (3, 2, 1));
        assert_eq!(jumps[0].delta_log2, -1.0);
    }

    #[test]
    fn test_changes_inside_gap_are_absorbed() {
        // 0 -> 1 and 1 -> 2 land inside the first gap and only move the
        // reference band, so the jump at t=5 is measured from band 2
        let dom = series(&[0, 1, 2, 2, 2, 0]);
        let jumps = ShellJumpDetector::new(3).detect(&dom, &EDGES);
        let summary: Vec<_> = jumps.iter().map(|j| (j.t, j.from, j.to)).collect();
        assert_eq!(summary, vec![(5, 2, 0)]);
    }

    #[test]
    fn test_empty_and_single_sample() {
        let detector = ShellJumpDetector::default();
        assert!(detector.detect(&[], &EDGES).is_empty());
        assert!(detector.detect(&[Some(1)], &EDGES).is_empty());
    }

    #[test]
    fn test_delta_is_rounded() {
        // centers sqrt(10*20) and sqrt(20*50): log2 ratio = 0.5*log2(5) = 1.160964...
        let jumps = ShellJumpDetector::new(1).detect(&series(&[0, 1]), &[10.0, 20.0, 50.0]);
        assert_eq!(jumps[0].delta_log2, 1.161);
    }

    #[test]
    fn test_serializes_as_tuple() {
        let jump = ShellJump {
            t: 12,
            from: 1,
            to: 2,
            delta_log2: 1.0,
        };
        assert_eq!(serde_json::to_string(&jump).unwrap(), "[12,1,2,1.0]");
    }
}
