//! Crate-level error taxonomy.
//!
//! Almost everything in this pipeline degrades instead of failing: broken
//! files land in the failure map, unresolvable imports are retained with a
//! reason, and degenerate input produces an empty but well-formed bundle.
//! The variants here are the few conditions the surrounding service is
//! expected to surface to a user.

use thiserror::Error;

/// Errors returned from the pipeline entry points.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The upstream collaborator supplied no file contents at all.
    #[error("no files were supplied for analysis")]
    NoFiles,
    /// Invalid analysis configuration.
    #[error("invalid analysis configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}
