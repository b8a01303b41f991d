//! Error types for warpscan

use crate::runtime::Stage;
use thiserror::Error;

/// Result type alias using warpscan's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a scan
///
/// Every variant aborts the whole scan: no output element is considered
/// valid once an error has been returned, and nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// The transient carry buffer could not be obtained
    #[error("Allocation failure: requested {bytes} bytes, {available} bytes available")]
    AllocationFailure {
        /// Requested size in bytes
        bytes: usize,
        /// Bytes still available on the device when the request was made
        available: usize,
    },

    /// A stage could not be dispatched, or reported an error once it finished
    #[error("Launch failure in {stage}: {reason}")]
    LaunchFailure {
        /// The stage whose launch failed
        stage: Stage,
        /// Description of the failure (panic payload for operator faults)
        reason: String,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an allocation failure error
    pub fn allocation(bytes: usize, available: usize) -> Self {
        Self::AllocationFailure { bytes, available }
    }

    /// Create a launch failure error
    pub fn launch(stage: Stage, reason: impl Into<String>) -> Self {
        Self::LaunchFailure {
            stage,
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// True for errors raised by a kernel launch (including operator faults)
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::LaunchFailure { .. })
    }
}
