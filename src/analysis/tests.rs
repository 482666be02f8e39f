use super::*;
use std::f64::consts::PI;

/// 20 Hz for the first second, 40 Hz for the second (one octave up)
fn octave_step_signal(fs: f64) -> Vec<f64> {
    (0..(2.0 * fs) as usize)
        .map(|i| {
            let t = i as f64 / fs;
            let freq = if t < 1.0 { 20.0 } else { 40.0 };
            (2.0 * PI * freq * t).sin()
        })
        .collect()
}

/// Linear-interpolated percentile over every matrix entry
fn percentile(values: impl Iterator<Item = f64>, q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

fn has_octave_jump(jumps: &[ShellJump]) -> bool {
    jumps.iter().any(|jump| (jump.delta_log2 - 1.0).abs() < 0.2)
}

#[test]
fn test_octave_step_detected_end_to_end() {
    let fs = 1000.0;
    let signal = octave_step_signal(fs);
    let config = ShellTrackerConfig {
        n_bands: 5,
        min_gap: 10,
        ..ShellTrackerConfig::default()
    };

    let report = detect_shell_jumps_series(&signal, fs, 8.0, 128.0, &config).unwrap();
    assert_eq!(report.edges, vec![8.0, 16.0, 32.0, 64.0, 128.0]);
    assert!(
        has_octave_jump(&report.jumps),
        "No octave jump found: {:?}",
        report.jumps
    );
}

#[test]
fn test_octave_step_with_percentile_floor() {
    let fs = 1000.0;
    let signal = octave_step_signal(fs);
    let edges = octave_band_edges(8.0, 128.0, 5);

    let energy = filterbank_energy(&signal, fs, &edges).unwrap();
    let floor = percentile(energy.values(), 80.0);
    let dominant = dominant_shell_indices(&energy, Some(floor));
    let jumps = ShellJumpDetector::new(10).detect(&dominant, &edges);

    assert!(dominant.iter().any(Option::is_none));
    assert!(has_octave_jump(&jumps), "No octave jump found: {:?}", jumps);
}

#[test]
fn test_dominant_band_follows_frequency() {
    let fs = 1000.0;
    let signal = octave_step_signal(fs);
    let config = ShellTrackerConfig {
        n_bands: 5,
        min_gap: 10,
        ..ShellTrackerConfig::default()
    };
    let trace = ShellTracker::new(fs, config)
        .track(&signal, 8.0, 128.0)
        .unwrap();

    assert_eq!(trace.energy.n_bands(), 4);
    assert_eq!(trace.dominant.len(), signal.len());
    assert_eq!(trace.dominant[500], Some(1));
    assert_eq!(trace.dominant[1500], Some(2));
}

#[test]
fn test_pipeline_is_deterministic() {
    let fs = 1000.0;
    let signal = octave_step_signal(fs);
    let config = ShellTrackerConfig {
        n_bands: 5,
        energy_min: Some(0.05),
        min_gap: 10,
        ..ShellTrackerConfig::default()
    };

    let first = detect_shell_jumps_series(&signal, fs, 8.0, 128.0, &config).unwrap();
    let second = detect_shell_jumps_series(&signal, fs, 8.0, 128.0, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_invalid_range_is_rejected() {
    let signal = octave_step_signal(1000.0);
    let config = ShellTrackerConfig::default();

    let err = detect_shell_jumps_series(&signal, 1000.0, 128.0, 8.0, &config).unwrap_err();
    assert!(matches!(err, SpectralError::InvalidRange { .. }));
}

#[test]
fn test_invalid_sample_rate_is_rejected() {
    let signal = octave_step_signal(1000.0);
    let config = ShellTrackerConfig::default();

    let err = detect_shell_jumps_series(&signal, 0.0, 8.0, 128.0, &config).unwrap_err();
    assert!(matches!(err, SpectralError::InvalidSampleRate { .. }));
}

#[test]
fn test_report_json_shape() {
    let fs = 1000.0;
    let signal = octave_step_signal(fs);
    let config = ShellTrackerConfig {
        n_bands: 5,
        min_gap: 10,
        ..ShellTrackerConfig::default()
    };
    let report = detect_shell_jumps_series(&signal, fs, 8.0, 128.0, &config).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["edges"].as_array().unwrap().len(), 5);
    let jumps = json["jumps"].as_array().unwrap();
    assert!(!jumps.is_empty());
    assert!(jumps.iter().all(|jump| jump.as_array().unwrap().len() == 4));
}

#[test]
fn test_pure_tone_has_no_jumps() {
    let fs = 1000.0;
    let signal: Vec<f64> = (0..2000)
        .map(|i| (2.0 * PI * 45.0 * i as f64 / fs).sin())
        .collect();
    let config = ShellTrackerConfig {
        n_bands: 5,
        min_gap: 10,
        ..ShellTrackerConfig::default()
    };
    let trace = ShellTracker::new(fs, config)
        .track(&signal, 8.0, 128.0)
        .unwrap();

    assert!(trace.dominant[100..1900].iter().all(|&d| d == Some(2)));
}
