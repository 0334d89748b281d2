//! # Policy Model
//!
//! Descriptor types exchanged between an interception host and the
//! policy engine. The host owns connection acceptance, TLS handshake,
//! certificate issuance and HTTP parsing; it hands the engine one
//! structured descriptor per event and commits whatever comes back.
//!
//! | Descriptor | Created | Policy-mutable fields |
//! |------------|---------|-----------------------|
//! | [`Session`] | at TLS handshake, before HTTP visibility | `server_addr`, `action` |
//! | [`Request`] | per HTTP request | `path`, `header`, `action` |
//! | [`Response`] | per HTTP response | `status`, `body`, `header`, `action` |
//!
//! A [`Response`] always carries its originating [`Request`], which is
//! read-only from the policy's perspective and never reassigned.
//!
//! Everything here is plain data: no I/O, no clocks, no hidden state.
//! Two identical descriptors dispatched through the same rule table
//! must produce identical outputs.

mod action;
mod http;
mod session;

pub use action::{Action, Method};
pub use http::{Request, Response};
pub use session::Session;

use serde::{Deserialize, Serialize};

/// The three extension points at which the host invokes the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// TLS handshake completed, SNI visible, no HTTP yet.
    Session,
    /// An HTTP request has been parsed.
    Request,
    /// An HTTP response has been received from upstream.
    Response,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Session => write!(f, "session"),
            Self::Request => write!(f, "request"),
            Self::Response => write!(f, "response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_serde_names() {
        assert_eq!(serde_json::to_string(&EventKind::Session).unwrap(), "\"session\"");
        assert_eq!(serde_json::to_string(&EventKind::Response).unwrap(), "\"response\"");
        let parsed: EventKind = serde_json::from_str("\"request\"").unwrap();
        assert_eq!(parsed, EventKind::Request);
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::Session.to_string(), "session");
        assert_eq!(EventKind::Request.to_string(), "request");
        assert_eq!(EventKind::Response.to_string(), "response");
    }
}
