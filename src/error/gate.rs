// Linear-response gate error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Gate error code constants
///
/// Error code range: 4001-4003
pub struct GateErrorCodes {}

impl GateErrorCodes {
    /// No evaluator registered under the requested domain name
    pub const UNKNOWN_DOMAIN: i32 = 4001;

    /// Black-hole parameters violate M^2 >= a^2 + Q^2
    pub const EXTREMALITY_VIOLATED: i32 = 4002;

    /// A gate parameter is missing or out of range
    pub const INVALID_PARAMETER: i32 = 4003;
}

/// Log a gate error with structured context
pub fn log_gate_error(err: &GateError, context: &str) {
    error!(
        "Gate error in {}: code={}, component=LinearResponseGate, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Linear-response gate errors
///
/// Error code ranges: 4001-4003
#[derive(Debug, Clone, PartialEq)]
pub enum GateError {
    /// Domain name not present in the registry
    UnknownDomain { domain: String },

    /// Horizon radius undefined (naked singularity)
    ExtremalityViolated { mass: f64, spin: f64, charge: f64 },

    /// Parameter missing or invalid
    InvalidParameter { name: String, reason: String },
}

impl ErrorCode for GateError {
    fn code(&self) -> i32 {
        match self {
            GateError::UnknownDomain { .. } => GateErrorCodes::UNKNOWN_DOMAIN,
            GateError::ExtremalityViolated { .. } => GateErrorCodes::EXTREMALITY_VIOLATED,
            GateError::InvalidParameter { .. } => GateErrorCodes::INVALID_PARAMETER,
        }
    }

    fn message(&self) -> String {
        match self {
            GateError::UnknownDomain { domain } => {
                format!(
                    "No linear-response evaluator registered for domain '{}'",
                    domain
                )
            }
            GateError::ExtremalityViolated {
                mass,
                spin,
                charge,
            } => {
                format!(
                    "Extremality violated: M^2 < a^2 + Q^2 (M={}, a={}, Q={})",
                    mass, spin, charge
                )
            }
            GateError::InvalidParameter { name, reason } => {
                format!("Invalid gate parameter '{}': {}", name, reason)
            }
        }
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GateError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for GateError {}
