//! Error types for mutation application.

use policy_json::JsonPathError;
use thiserror::Error;

/// A mutation failed to apply.
///
/// Any of these voids the whole rule it occurred in: the dispatcher
/// discards the partial edit and keeps the pre-rule descriptor. None
/// of them may abort the host's processing of the connection.
#[derive(Debug, Error)]
pub enum MutateError {
    /// The response body failed to decode as JSON when a JSON
    /// mutation was attempted.
    #[error("response body is not valid JSON: {0}")]
    InvalidJsonBody(#[source] serde_json::Error),

    /// A strict-mode JSON edit targeted an absent path.
    #[error("JSON path not found: {path}")]
    JsonPathNotFound {
        /// The path that failed to resolve.
        path: String,
    },

    /// A JSON append targeted a value that is not an array.
    #[error("JSON path does not address an array: {path}")]
    NotAnArray {
        /// The path of the non-array target.
        path: String,
    },

    /// A body splice could not find its marker substring.
    #[error("marker {marker:?} not found in response body")]
    MarkerNotFound {
        /// The missing marker.
        marker: String,
    },

    /// The mutation variant is not legal for this event kind.
    #[error("mutation `{mutation}` does not apply to {event} events")]
    NotApplicable {
        /// Name of the mutation variant.
        mutation: &'static str,
        /// The event kind it was applied to.
        event: &'static str,
    },
}

impl From<JsonPathError> for MutateError {
    fn from(err: JsonPathError) -> Self {
        match err {
            JsonPathError::NotAnArray { path } => Self::NotAnArray { path },
            JsonPathError::PathNotFound { path } => Self::JsonPathNotFound { path },
            // Parse-shape errors cannot escape load-time validation,
            // but map them to the closest runtime meaning anyway.
            JsonPathError::Empty => Self::JsonPathNotFound {
                path: String::new(),
            },
            JsonPathError::EmptySegment(_) => Self::JsonPathNotFound {
                path: String::new(),
            },
        }
    }
}
