//! # Policy JSON
//!
//! Safe nested-field access over JSON documents, used by the mutation
//! engine for response body edits.
//!
//! Paths are dot-separated sequences of object keys and array
//! indices, e.g. `data.tenantSettings.customLogo` or
//! `enterprisecategories.0.Name`. A segment consisting only of ASCII
//! digits addresses an array index; everything else is an object key.
//!
//! Three operations are exposed:
//!
//! | Operation | Behavior on absent path |
//! |-----------|------------------------|
//! | [`get`] | returns `None` |
//! | [`set`] | fails with [`JsonPathError::PathNotFound`] |
//! | [`append`] | fails with `PathNotFound` or [`JsonPathError::NotAnArray`] |
//!
//! `set` never auto-creates intermediate containers: every segment up
//! to the last must already resolve. The final key may be inserted
//! into an existing object, which is how new top-level fields land in
//! a body. Whether an absent path is an error or a skip is decided by
//! the rule that requested the edit, not here.
//!
//! The `serde_json` dependency is built with `preserve_order`, so
//! object fields an edit does not touch round-trip in their original
//! order.

mod access;
mod path;

pub use access::{append, get, set};
pub use path::{JsonPath, Segment};

use thiserror::Error;

/// Errors produced by path parsing and document edits.
#[derive(Debug, Error)]
pub enum JsonPathError {
    /// The path string was empty.
    #[error("empty JSON path")]
    Empty,

    /// A path contained an empty segment (`a..b` or a trailing dot).
    #[error("empty segment at position {0} in JSON path")]
    EmptySegment(usize),

    /// A segment did not resolve against the document.
    #[error("JSON path not found: {path}")]
    PathNotFound {
        /// The full path that failed to resolve.
        path: String,
    },

    /// An append targeted a value that is not an array.
    #[error("JSON path does not address an array: {path}")]
    NotAnArray {
        /// The full path of the non-array target.
        path: String,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, JsonPathError>;
