//! Host predicates.

use serde::{Deserialize, Serialize};

/// Case-insensitive exact-or-set host match.
///
/// For sessions the predicate is evaluated against the SNI hostname;
/// for requests and responses, against the request's `host` field.
/// In rule files a single host may be written as a bare string:
///
/// ```json
/// "host": "meetlookup.com"
/// "host": ["www.opendns.com", "opendns.com"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostMatch {
    /// A single hostname.
    One(String),
    /// Any hostname in the set.
    AnyOf(Vec<String>),
}

impl HostMatch {
    /// All hostnames this predicate covers, used to index the rule
    /// table (a rule listing several hosts is indexed under each).
    pub fn hosts(&self) -> &[String] {
        match self {
            Self::One(host) => std::slice::from_ref(host),
            Self::AnyOf(hosts) => hosts,
        }
    }

    /// Case-insensitive membership test.
    pub fn matches(&self, host: &str) -> bool {
        self.hosts().iter().any(|h| h.eq_ignore_ascii_case(host))
    }
}
