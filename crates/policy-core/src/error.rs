//! Configuration loading errors.
//!
//! Everything here is fatal at load or reload time. Per-event
//! failures (a body that is not JSON, an absent path, a missing
//! marker) are handled inside dispatch and never surface as errors
//! to the host.

use std::path::PathBuf;
use thiserror::Error;

/// A rule configuration failed to load.
///
/// A broken configuration must never silently produce an empty or
/// partially loaded table, so loading is all-or-nothing.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The rule file could not be read.
    #[error("failed to read rule file {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The rule document failed to parse.
    #[error("failed to parse rule configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A rule failed semantic validation.
    #[error("rule `{rule}`: {reason}")]
    InvalidRule {
        /// Id of the offending rule (its list position when the id is
        /// empty).
        rule: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Two rules share an id.
    #[error("duplicate rule id `{0}`")]
    DuplicateId(String),
}
