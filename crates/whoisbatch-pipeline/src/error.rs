use thiserror::Error;
use whoisbatch_core::LookupError;

/// Result type alias for pipeline setup
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Errors raised while setting up a run.
///
/// Individual target failures never surface here; they are recorded on the
/// target's result.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Settings that cannot drive a run
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `run` was called on a scheduler that already ran
    #[error("scheduler already started")]
    AlreadyStarted,

    /// Building the lookup client failed
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
