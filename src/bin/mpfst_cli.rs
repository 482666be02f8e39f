use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mpfst_signal::analysis::detect_shell_jumps_series;
use mpfst_signal::coherence::{CoherenceAnalyzer, CoherenceSummary};
use mpfst_signal::config::AnalysisConfig;
use mpfst_signal::fractional::{invert_beta, DEFAULT_BETA_WEIGHTS};
use mpfst_signal::gating::{
    activation, CoherenceBand, GateOutcome, GateParams, GateRegistry, GW_VBK_DOMAIN,
};
use mpfst_signal::input::{load_signal, SignalInput};
use serde::Serialize;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "mpfst_cli",
    about = "Batch shell-jump detection, coherence scoring and gate evaluation"
)]
struct Cli {
    /// JSON analysis configuration (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at DEBUG level on stderr
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Track the dominant octave band and report shell jumps
    ShellJumps {
        #[arg(long)]
        input: PathBuf,
        /// Sample rate in Hz, overriding the file's own
        #[arg(long)]
        fs: Option<f64>,
        #[arg(long)]
        fmin: f64,
        #[arg(long)]
        fmax: f64,
        #[arg(long)]
        bands: Option<usize>,
        #[arg(long)]
        energy_min: Option<f64>,
        #[arg(long)]
        min_gap: Option<usize>,
    },
    /// Compute mu, gamma, H and the coherence meter m_l
    Coherence {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        fs: Option<f64>,
    },
    /// Evaluate a linear-response gate
    Gate {
        #[arg(long, default_value = GW_VBK_DOMAIN)]
        domain: String,
        #[arg(long)]
        mass: f64,
        #[arg(long)]
        spin: f64,
        #[arg(long, default_value_t = 0.0)]
        charge: f64,
        /// Azimuthal mode number
        #[arg(long = "m", default_value_t = 1)]
        azimuthal_m: i32,
        /// Test-field charge
        #[arg(long = "q", default_value_t = 0.0)]
        field_charge: f64,
        /// Test-field mass
        #[arg(long)]
        mu: f64,
        /// Growth-weight scale C
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Coherence score; adds the activation decision when given
        #[arg(long)]
        m_l: Option<f64>,
    },
    /// Invert beta from the tail index and spectral slope
    Invert {
        #[arg(long)]
        mu: Option<f64>,
        #[arg(long)]
        gamma: Option<f64>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load_strict(path)?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::ShellJumps {
            input,
            fs,
            fmin,
            fmax,
            bands,
            energy_min,
            min_gap,
        } => {
            let mut tracker = config.shell_tracker;
            if let Some(bands) = bands {
                tracker.n_bands = bands;
            }
            if energy_min.is_some() {
                tracker.energy_min = energy_min;
            }
            if let Some(min_gap) = min_gap {
                tracker.min_gap = min_gap;
            }

            let (signal, sample_rate) = load_with_rate(&input, fs)?;
            let report =
                detect_shell_jumps_series(&signal.samples, sample_rate, fmin, fmax, &tracker)
                    .with_context(|| format!("detecting shell jumps in {}", input.display()))?;
            tracing::info!(jumps = report.jumps.len(), "shell-jump detection finished");
            emit_json(&report)?;
        }
        Commands::Coherence { input, fs } => {
            let (signal, sample_rate) = load_with_rate(&input, fs)?;
            let summary = CoherenceAnalyzer::new(sample_rate, config.coherence)
                .analyze(&signal.samples);
            let band = CoherenceBand::classify(summary.m_l, &config.gate);
            emit_json(&CoherencePayload { summary, band })?;
        }
        Commands::Gate {
            domain,
            mass,
            spin,
            charge,
            azimuthal_m,
            field_charge,
            mu,
            scale,
            m_l,
        } => {
            let params = GateParams::new()
                .with("M", mass)
                .with("a", spin)
                .with("Q", charge)
                .with("m", azimuthal_m as f64)
                .with("q", field_charge)
                .with("mu", mu)
                .with("C", scale);
            let outcome = GateRegistry::with_builtins()
                .evaluate(&domain, &params)
                .with_context(|| format!("evaluating gate for domain '{}'", domain))?;
            let active = m_l.map(|m_l| activation(m_l, &outcome, &config.gate));
            emit_json(&GatePayload { outcome, active })?;
        }
        Commands::Invert { mu, gamma } => {
            let beta = invert_beta(mu, gamma, DEFAULT_BETA_WEIGHTS);
            emit_json(&serde_json::json!({ "beta": beta }))?;
        }
    }

    Ok(ExitCode::from(0))
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_with_rate(path: &Path, fs: Option<f64>) -> Result<(SignalInput, f64)> {
    let signal = load_signal(path)?;
    let sample_rate = signal
        .resolve_sample_rate(fs)
        .with_context(|| format!("resolving sample rate for {}", path.display()))?;
    tracing::debug!(
        samples = signal.samples.len(),
        sample_rate,
        "loaded {}",
        path.display()
    );
    Ok((signal, sample_rate))
}

fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[derive(Serialize)]
struct CoherencePayload {
    #[serde(flatten)]
    summary: CoherenceSummary,
    band: CoherenceBand,
}

#[derive(Serialize)]
struct GatePayload {
    #[serde(flatten)]
    outcome: GateOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
}
