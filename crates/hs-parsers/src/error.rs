//! Failure taxonomy for the external `log show` collaborator.
//!
//! This is the only error class that propagates to the response envelope.
//! Per-line and per-file parse failures are recovered locally inside the
//! parsers and never reach here.

use std::time::Duration;

use thiserror::Error;

/// Errors from invoking the unified-log query utility.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The `log` binary could not be spawned at all.
    #[error("unified logging utility unavailable: {0}")]
    Unavailable(String),

    /// The utility ran but exited non-zero.
    #[error("log command failed with {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    /// The utility exceeded its execution budget and was killed.
    #[error("log command timed out after {0:?}")]
    TimedOut(Duration),
}

/// Convenience alias for runner results.
pub type RunnerResult<T> = Result<T, RunnerError>;
