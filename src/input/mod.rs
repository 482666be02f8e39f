//! Signal loaders for the CLI and integration tests
//!
//! Supported formats, chosen by file extension:
//! - `.wav`: mono PCM (16/24/32-bit int or 32-bit float), normalized to [-1, 1]
//! - `.json`: `{"x": [...], "fs": 100.0}` (fs optional) or a bare array
//! - `.csv`: header row with an `x` column, one sample per row

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Samples read from disk plus the rate the file declares, if any
#[derive(Debug, Clone, PartialEq)]
pub struct SignalInput {
    pub samples: Vec<f64>,
    pub sample_rate: Option<f64>,
}

impl SignalInput {
    /// Resolve the sample rate, letting an explicit override win
    pub fn resolve_sample_rate(&self, override_fs: Option<f64>) -> Result<f64> {
        let fs = override_fs.or(self.sample_rate).ok_or_else(|| {
            anyhow!("sample rate unknown: pass --fs or use a file that declares it")
        })?;
        if !fs.is_finite() || fs <= 0.0 {
            bail!("sample rate must be positive, got {}", fs);
        }
        Ok(fs)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSignal {
    Object { x: Vec<f64>, fs: Option<f64> },
    Bare(Vec<f64>),
}

/// Load a signal, dispatching on the file extension
pub fn load_signal<P: AsRef<Path>>(path: P) -> Result<SignalInput> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let input = match extension.as_str() {
        "wav" => load_wav(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!(
            "unsupported input format '{}' for {} (expected wav, json or csv)",
            other,
            path.display()
        ),
    };

    log::info!(
        "[Input] Loaded {} samples from {} (fs={:?})",
        input.samples.len(),
        path.display(),
        input.sample_rate
    );
    Ok(input)
}

fn load_wav(path: &Path) -> Result<SignalInput> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        bail!(
            "{} must be mono (found {} channels)",
            path.display(),
            spec.channels
        );
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map(f64::from).map_err(|err| anyhow!(err)))
            .collect::<Result<Vec<f64>>>()?,
        hound::SampleFormat::Int => {
            let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f64;
            match spec.bits_per_sample {
                16 => reader
                    .samples::<i16>()
                    .map(|sample| {
                        sample
                            .map(|value| value as f64 / max)
                            .map_err(|err| anyhow!(err))
                    })
                    .collect::<Result<Vec<f64>>>()?,
                24 | 32 => reader
                    .samples::<i32>()
                    .map(|sample| {
                        sample
                            .map(|value| value as f64 / max)
                            .map_err(|err| anyhow!(err))
                    })
                    .collect::<Result<Vec<f64>>>()?,
                other => bail!(
                    "Unsupported bits per sample {} in {}",
                    other,
                    path.display()
                ),
            }
        }
    };

    Ok(SignalInput {
        samples,
        sample_rate: Some(spec.sample_rate as f64),
    })
}

fn load_json(path: &Path) -> Result<SignalInput> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed: JsonSignal = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {} as a signal array", path.display()))?;

    Ok(match parsed {
        JsonSignal::Object { x, fs } => SignalInput {
            samples: x,
            sample_rate: fs,
        },
        JsonSignal::Bare(samples) => SignalInput {
            samples,
            sample_rate: None,
        },
    })
}

fn load_csv(path: &Path) -> Result<SignalInput> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut lines = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| anyhow!("{} is empty", path.display()))?;
    let column = header
        .split(',')
        .position(|name| name.trim().trim_matches('"') == "x")
        .ok_or_else(|| anyhow!("{} has no 'x' column", path.display()))?;

    let samples = lines
        .map(|(index, line)| {
            let field = line.split(',').nth(column).ok_or_else(|| {
                anyhow!("{}:{} is missing column 'x'", path.display(), index + 1)
            })?;
            field.trim().parse::<f64>().with_context(|| {
                format!("{}:{} has a non-numeric sample", path.display(), index + 1)
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(SignalInput {
        samples,
        sample_rate: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_object_and_bare_array() {
        let dir = tempdir().unwrap();
        let object = dir.path().join("object.json");
        fs::write(&object, r#"{"x": [0.0, 1.5, -2.0], "fs": 250.0}"#).unwrap();
        let bare = dir.path().join("bare.json");
        fs::write(&bare, "[1, 2, 3]").unwrap();

        let loaded = load_signal(&object).unwrap();
        assert_eq!(loaded.samples, vec![0.0, 1.5, -2.0]);
        assert_eq!(loaded.sample_rate, Some(250.0));

        let loaded = load_signal(&bare).unwrap();
        assert_eq!(loaded.samples, vec![1.0, 2.0, 3.0]);
        assert_eq!(loaded.sample_rate, None);
    }

    #[test]
    fn test_csv_x_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("signal.csv");
        fs::write(&path, "t,x\n0,0.5\n1,-0.25\n\n2,1e-3\n").unwrap();

        let loaded = load_signal(&path).unwrap();
        assert_eq!(loaded.samples, vec![0.5, -0.25, 1e-3]);
    }

    #[test]
    fn test_csv_errors() {
        let dir = tempdir().unwrap();
        let no_column = dir.path().join("no_column.csv");
        fs::write(&no_column, "t,y\n0,1\n").unwrap();
        let bad_value = dir.path().join("bad_value.csv");
        fs::write(&bad_value, "x\n1.0\nabc\n").unwrap();

        assert!(load_signal(&no_column).is_err());
        let err = load_signal(&bad_value).unwrap_err();
        assert!(format!("{:#}", err).contains(":3"));
    }

    #[test]
    fn test_wav_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for value in [0i16, 16384, -32767, 32767] {
            writer.write_sample(value).unwrap();
        }
        writer.finalize().unwrap();

        let loaded = load_signal(&path).unwrap();
        assert_eq!(loaded.sample_rate, Some(8000.0));
        assert_eq!(loaded.samples.len(), 4);
        assert_eq!(loaded.samples[2], -1.0);
        assert_eq!(loaded.samples[3], 1.0);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(load_signal("signal.mseed").is_err());
    }

    #[test]
    fn test_resolve_sample_rate() {
        let input = SignalInput {
            samples: vec![],
            sample_rate: Some(100.0),
        };
        assert_eq!(input.resolve_sample_rate(None).unwrap(), 100.0);
        assert_eq!(input.resolve_sample_rate(Some(50.0)).unwrap(), 50.0);
        assert!(input.resolve_sample_rate(Some(0.0)).is_err());

        let unknown = SignalInput {
            samples: vec![],
            sample_rate: None,
        };
        assert!(unknown.resolve_sample_rate(None).is_err());
    }
}
