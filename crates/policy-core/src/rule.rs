//! Rule types, the configuration document, and validation.

use crate::{LoadError, Result};
use policy_match::{HostMatch, PathMatch};
use policy_model::{EventKind, Method, Request, Response, Session};
use policy_mutate::{MissingPath, Mutation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One declarative (predicate, mutation-chain) pair.
///
/// Rules are immutable once loaded. Within a matched rule the
/// mutations apply in declared order; across rules, declaration order
/// in the configuration decides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Stable identifier used in logs when the rule fails to apply.
    pub id: String,

    /// Which extension point this rule fires at.
    pub event: EventKind,

    /// Host predicate (SNI for sessions).
    pub host: HostMatch,

    /// Optional path constraint. Omitted means every path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathMatch>,

    /// Optional method constraint. Omitted means every method.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,

    /// The edits to apply, in order.
    pub mutations: Vec<Mutation>,

    /// Strictness for JSON edits whose path is absent from the body.
    #[serde(default, skip_serializing_if = "is_default_missing")]
    pub on_missing_path: MissingPath,
}

fn is_default_missing(missing: &MissingPath) -> bool {
    *missing == MissingPath::Fail
}

impl Rule {
    /// Session predicate: SNI membership. Sessions carry no path or
    /// method, so a constraint on either can never match.
    pub fn matches_session(&self, session: &Session) -> bool {
        self.host.matches(&session.sni) && self.path.is_none() && self.method.is_none()
    }

    /// Request predicate: host, then method, then path.
    pub fn matches_request(&self, request: &Request) -> bool {
        self.host.matches(&request.host)
            && self.method.map_or(true, |m| m == request.method)
            && self.path.as_ref().map_or(true, |p| p.matches(&request.path))
    }

    /// Response predicate, evaluated against the originating request.
    pub fn matches_response(&self, response: &Response) -> bool {
        self.matches_request(&response.request)
    }

    fn validate(&self, position: usize) -> Result<()> {
        let label = if self.id.is_empty() {
            format!("#{position}")
        } else {
            self.id.clone()
        };
        let invalid = |reason: String| LoadError::InvalidRule {
            rule: label.clone(),
            reason,
        };

        if self.id.is_empty() {
            return Err(invalid("rule id must not be empty".to_string()));
        }
        if self.host.hosts().is_empty() || self.host.hosts().iter().any(String::is_empty) {
            return Err(invalid("host list must not be empty".to_string()));
        }
        if self.mutations.is_empty() {
            return Err(invalid("mutation chain must not be empty".to_string()));
        }
        if let Some(path) = &self.path {
            if !path.is_constrained() {
                return Err(invalid(
                    "path matcher has no constraint; omit `path` to match every path".to_string(),
                ));
            }
        }
        if self.event == EventKind::Session && (self.path.is_some() || self.method.is_some()) {
            return Err(invalid(
                "session rules cannot constrain path or method".to_string(),
            ));
        }
        for mutation in &self.mutations {
            if !mutation.applies_to(self.event) {
                return Err(invalid(format!(
                    "mutation `{}` does not apply to {} events",
                    mutation.kind(),
                    self.event
                )));
            }
            if let Mutation::SetStatus(status) = mutation {
                if !(100..=599).contains(status) {
                    return Err(invalid(format!("status {status} is out of range")));
                }
            }
            if let Mutation::SpliceBody { marker, .. } | Mutation::InjectScript { marker, .. } =
                mutation
            {
                if marker.is_empty() {
                    return Err(invalid("splice marker must not be empty".to_string()));
                }
            }
            if let Mutation::EditJson { edits } = mutation {
                if edits.is_empty() {
                    return Err(invalid("edit_json must carry at least one edit".to_string()));
                }
            }
        }
        Ok(())
    }
}

/// The full, ordered rule configuration.
///
/// This is the logical shape of the external human-editable format:
/// a list of `{event, host(s), path?, method?, mutations}` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Parses and validates a JSON rule document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let set: Self = serde_json::from_str(raw)?;
        set.validate()?;
        Ok(set)
    }

    /// Reads, parses and validates a rule file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Semantic validation over every rule. All-or-nothing: one bad
    /// rule rejects the whole document.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (position, rule) in self.rules.iter().enumerate() {
            rule.validate(position)?;
            if !seen.insert(rule.id.as_str()) {
                return Err(LoadError::DuplicateId(rule.id.clone()));
            }
        }
        Ok(())
    }
}
