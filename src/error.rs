//! Error type shared by every stage of the transfer-function engine.

use thiserror::Error;

/// Errors raised by oscillator construction, evaluation, mixing and export.
///
/// Non-finite samples produced by a singular admittance are *not* an error
/// during evaluation: they are kept in the output arrays. `NumericSingularity`
/// is only returned when a caller explicitly asks for a finiteness check.
#[derive(Debug, Error)]
pub enum OscillatorError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{required} requires the oscillator to be evaluated first (current stage: {current})")]
    Sequencing {
        required: &'static str,
        current: &'static str,
    },

    #[error("size mismatch: expected {expected} samples, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("oscillators were evaluated on different frequency sweeps")]
    SweepMismatch,

    #[error("{count} non-finite sample(s), first at index {first_index}")]
    NumericSingularity { count: usize, first_index: usize },

    #[error("batch evaluation was cancelled")]
    Cancelled,

    #[error("npz write error: {0}")]
    WriteNpz(#[from] ndarray_npy::WriteNpzError),

    #[error("npz read error: {0}")]
    ReadNpz(#[from] ndarray_npy::ReadNpzError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OscillatorError>;
