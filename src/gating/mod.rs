// Gating module - coherence-gated linear-response activation
//
// A mode activates when coherence clears the lower threshold (m_l > m1) AND
// the domain's linear-response operator admits a localized growing solution.
//
// Architecture:
// - superradiance: Kerr-Newman gate (quasibound + superradiant window)
// - hazard: empirical event rate as a function of m_l
// - DomainAdapter: closed set of built-in evaluators
// - GateRegistry: owned name -> evaluator table, extended explicitly at startup

pub mod hazard;
pub mod superradiance;

pub use hazard::{hazard_curve, HazardCurve};
pub use superradiance::BhParams;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::GateConfig;
use crate::error::{log_gate_error, GateError};

/// Result of one linear-response evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GateOutcome {
    /// Growing localized solution exists
    pub gate: bool,
    /// Relative growth weight, 0 when the gate is closed
    pub weight: f64,
    pub omega_c: f64,
    pub mu0: f64,
}

/// Domain-specific linear-response operator
pub trait LinearResponseEvaluator {
    fn evaluate(&self) -> Result<GateOutcome, GateError>;
}

/// Built-in domain adapters
#[derive(Debug, Clone, PartialEq)]
pub enum DomainAdapter {
    /// Ringdown superradiance with growth-weight scale `C`
    GwSuperradiance { params: BhParams, scale: f64 },
}

impl DomainAdapter {
    /// Build the GW adapter from named parameters
    ///
    /// Keys: `M`, `a` (required), `Q`, `m`, `q`, `mu`, `C`.
    pub fn gw_superradiance(params: &GateParams) -> Result<Self, GateError> {
        Ok(DomainAdapter::GwSuperradiance {
            params: BhParams {
                mass: params.require("M")?,
                spin: params.require("a")?,
                charge: params.get_or("Q", 0.0),
                azimuthal_m: params.get_or("m", 1.0).round() as i32,
                field_charge: params.get_or("q", 0.0),
                field_mass: params.get_or("mu", 0.0),
            },
            scale: params.get_or("C", 1.0),
        })
    }
}

impl LinearResponseEvaluator for DomainAdapter {
    fn evaluate(&self) -> Result<GateOutcome, GateError> {
        match self {
            DomainAdapter::GwSuperradiance { params, scale } => params.evaluate(*scale),
        }
    }
}

/// Named numeric parameters passed to a registered evaluator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateParams {
    values: BTreeMap<String, f64>,
}

impl GateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    pub fn require(&self, name: &str) -> Result<f64, GateError> {
        self.get(name).ok_or_else(|| GateError::InvalidParameter {
            name: name.to_string(),
            reason: "required parameter missing".to_string(),
        })
    }
}

/// Evaluator callback stored in the registry
pub type EvaluatorFn = Box<dyn Fn(&GateParams) -> Result<GateOutcome, GateError> + Send + Sync>;

/// Registry name of the built-in GW superradiance adapter
pub const GW_VBK_DOMAIN: &str = "gw_vbk";

/// Name-keyed table of linear-response evaluators
///
/// Owned by the caller; there is no process-wide registry.
pub struct GateRegistry {
    evaluators: BTreeMap<String, EvaluatorFn>,
}

impl GateRegistry {
    /// Registry with no evaluators
    pub fn empty() -> Self {
        Self {
            evaluators: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in `DomainAdapter`
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(
            GW_VBK_DOMAIN,
            Box::new(|params: &GateParams| DomainAdapter::gw_superradiance(params)?.evaluate()),
        );
        registry
    }

    /// Register (or replace) the evaluator for `domain`
    pub fn register(&mut self, domain: &str, evaluator: EvaluatorFn) {
        if self
            .evaluators
            .insert(domain.to_string(), evaluator)
            .is_some()
        {
            log::warn!("[Gate] Replaced evaluator for domain '{}'", domain);
        }
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.evaluators.keys().map(String::as_str)
    }

    /// Evaluate the gate registered under `domain`
    ///
    /// # Errors
    /// `UnknownDomain` for an unregistered name, otherwise whatever the
    /// evaluator reports.
    pub fn evaluate(&self, domain: &str, params: &GateParams) -> Result<GateOutcome, GateError> {
        let evaluator = self
            .evaluators
            .get(domain)
            .ok_or_else(|| GateError::UnknownDomain {
                domain: domain.to_string(),
            })?;

        evaluator(params).map_err(|err| {
            log_gate_error(&err, domain);
            err
        })
    }
}

impl Default for GateRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Coherence regime of an m_l value against the gate thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoherenceBand {
    /// m_l <= m1
    Low,
    /// m1 < m_l <= m2
    Intermediate,
    /// m_l > m2
    High,
}

impl CoherenceBand {
    pub fn classify(m_l: f64, thresholds: &GateConfig) -> Self {
        if m_l > thresholds.m2 {
            CoherenceBand::High
        } else if m_l > thresholds.m1 {
            CoherenceBand::Intermediate
        } else {
            CoherenceBand::Low
        }
    }
}

/// A mode activates iff `m_l > m1` and the linear-response gate is open
pub fn activation(m_l: f64, outcome: &GateOutcome, thresholds: &GateConfig) -> bool {
    m_l > thresholds.m1 && outcome.gate
}
