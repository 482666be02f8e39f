// Error types for the MPFST signal toolkit
//
// This module defines custom error types for the spectral shell tracker and
// the linear-response gate, providing structured error handling with numeric
// error codes suitable for CLI exit reporting and JSON diagnostics.

mod gate;
mod spectral;

pub use gate::{log_gate_error, GateError, GateErrorCodes};
pub use spectral::{log_spectral_error, SpectralError, SpectralErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// library and CLI boundaries.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
