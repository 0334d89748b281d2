//! TLS session descriptor.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::Action;

/// One TLS connection prior to HTTP visibility.
///
/// Created by the host at handshake time, destroyed when the
/// connection closes. `server_addr` and `action` are the only fields
/// a policy may legally mutate; a session rule that touches anything
/// else is rejected at configuration load time.
///
/// `sni` is the Server Name Indication hostname, visible during the
/// handshake before any decryption happens. It is the session's
/// lookup key in the rule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Address of the connecting client.
    pub client_ip: String,

    /// Authenticated user, if the host resolved one.
    pub user: String,

    /// SNI hostname from the ClientHello.
    pub sni: String,

    /// Upstream address the host will dial. Policies rewrite this to
    /// redirect recognized domains to a different target; TLS
    /// termination itself stays with the host.
    pub server_addr: String,

    /// Local address the connection arrived on.
    pub source_ip: String,

    /// ACL names the host already assigned to this connection.
    pub acls: BTreeSet<String>,

    /// Category scores computed by the host.
    pub scores: BTreeMap<String, i64>,

    /// Outcome for this session.
    pub action: Action,

    /// Actions the host is willing to honor for this session.
    pub possible_actions: Vec<String>,
}

impl Session {
    /// Builds a session descriptor for the given SNI with every other
    /// field empty. Mostly useful for tests and host shims.
    pub fn for_sni(sni: impl Into<String>) -> Self {
        Self {
            sni: sni.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_sni() {
        let session = Session::for_sni("api.opendns.com");
        assert_eq!(session.sni, "api.opendns.com");
        assert_eq!(session.action, Action::Allow);
        assert!(session.server_addr.is_empty());
    }

    #[test]
    fn test_session_round_trips() {
        let mut session = Session::for_sni("example.com");
        session.server_addr = "10.0.0.1:443".to_string();
        session.acls.insert("bumped".to_string());
        let json = serde_json::to_string(&session).unwrap();
        let parsed: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
