// MPFST Signal - octave-band shell tracking and coherence scoring
// Batch signal descriptors, a composite coherence meter and a gated
// linear-response activation check

// Module declarations
pub mod analysis;
pub mod coherence;
pub mod config;
pub mod error;
pub mod fractional;
pub mod gating;
pub mod input;
pub mod nulls;
pub mod stats;

// Re-exports for convenience
pub use analysis::{detect_shell_jumps_series, ShellJump, ShellJumpReport, ShellTracker};
pub use coherence::{compute_m_l, CoherenceAnalyzer, CoherenceSummary, MeterWeights};
pub use config::AnalysisConfig;
pub use error::{ErrorCode, GateError, SpectralError};
pub use gating::{activation, CoherenceBand, GateOutcome, GateParams, GateRegistry};
