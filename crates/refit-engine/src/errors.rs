//! Pipeline failure types.

use thiserror::Error;

/// Fatal failures raised by the pipeline. Override conflicts are not
/// errors; they are reported as [`crate::OverrideConflict`] values.
#[derive(Debug, Error)]
pub enum ManipulationError {
    /// Malformed or missing user-supplied configuration. Raised while
    /// deriving manipulator states, before any scan runs.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A scan pass found the graph in a shape it could not safely
    /// transform later. Aborts the run before any mutation.
    #[error("scan failed in '{manipulator}': {reason}")]
    Scan {
        manipulator: &'static str,
        reason: String,
    },

    /// A manipulator failed while mutating the graph. Changes already
    /// applied by earlier manipulators are retained in memory.
    #[error("apply failed in '{manipulator}': {reason}")]
    Apply {
        manipulator: &'static str,
        reason: String,
    },
}

pub type ManipulationResult<T> = Result<T, ManipulationError>;
