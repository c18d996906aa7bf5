//! Error types for the control API
//!
//! The render path never raises any of these: internal inconsistency there
//! degrades to a silent buffer instead.

use thiserror::Error;

/// Errors reported by control calls. All are recoverable; none terminate
/// the process.
#[derive(Debug, Error, PartialEq)]
pub enum SynthError {
    /// Control call on a handle that was never created or already destroyed.
    #[error("synthesizer is not initialized")]
    NotInitialized,

    /// Rejected parameter value; the previous value is retained.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Destroy on an already-destroyed handle. Logged and skipped.
    #[error("synthesizer already destroyed")]
    DoubleDestroy,
}
