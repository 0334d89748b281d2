//! Path predicates.

use serde::{Deserialize, Serialize};

/// Path constraint for request and response rules.
///
/// Three forms are supported, combined as alternatives:
///
/// - `any_of`: exact-set membership,
/// - `prefix`: `starts_with` match,
/// - `except_prefix`: matches when the path does NOT start with the
///   prefix. This is the exclusion form that gates a broad block
///   behind a carve-out (e.g. everything except
///   `/launcherBadge_custom…`).
///
/// An exact entry for the path decides before the prefix forms are
/// consulted. A rule with no `path` field at all matches every path;
/// a `PathMatch` with no constraint set matches nothing and is
/// rejected at configuration load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathMatch {
    /// Exact paths, checked first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<String>,

    /// Matches paths starting with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Matches paths NOT starting with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub except_prefix: Option<String>,
}

impl PathMatch {
    /// Exact-set membership test.
    pub fn exact(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            any_of: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// `starts_with` test.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Negated `starts_with` test.
    pub fn except_prefix(prefix: impl Into<String>) -> Self {
        Self {
            except_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// True when at least one constraint is present.
    pub fn is_constrained(&self) -> bool {
        !self.any_of.is_empty() || self.prefix.is_some() || self.except_prefix.is_some()
    }

    /// Evaluates the predicate against a request path.
    pub fn matches(&self, path: &str) -> bool {
        if self.any_of.iter().any(|p| p == path) {
            return true;
        }
        if let Some(prefix) = &self.prefix {
            if path.starts_with(prefix.as_str()) {
                return true;
            }
        }
        if let Some(except) = &self.except_prefix {
            if !path.starts_with(except.as_str()) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_set() {
        let path = PathMatch::exact(["/geolocation/", "/geolocation"]);
        assert!(path.matches("/geolocation/"));
        assert!(path.matches("/geolocation"));
        assert!(!path.matches("/geolocation/2250/"));
    }

    #[test]
    fn test_prefix() {
        let path = PathMatch::prefix("/assets/drupal-js-files/pendo_");
        assert!(path.matches("/assets/drupal-js-files/pendo_abc.js"));
        assert!(!path.matches("/assets/other.js"));
    }

    #[test]
    fn test_except_prefix() {
        let path = PathMatch::except_prefix("/launcherBadge_custom");
        assert!(path.matches("/x"));
        assert!(path.matches("/data/guide.js"));
        assert!(!path.matches("/launcherBadge_custom"));
        assert!(!path.matches("/launcherBadge_custom/icon.png"));
    }

    #[test]
    fn test_exact_decides_before_prefix() {
        // An exact entry admits the path even when the prefix form
        // alone would not.
        let path = PathMatch {
            any_of: vec!["/special".to_string()],
            prefix: Some("/static/".to_string()),
            except_prefix: None,
        };
        assert!(path.matches("/special"));
        assert!(path.matches("/static/app.js"));
        assert!(!path.matches("/other"));
    }

    #[test]
    fn test_unconstrained_matches_nothing() {
        let path = PathMatch::default();
        assert!(!path.is_constrained());
        assert!(!path.matches("/anything"));
    }

    #[test]
    fn test_serde_shape() {
        let parsed: PathMatch =
            serde_json::from_str(r#"{"except_prefix":"/launcherBadge_custom"}"#).unwrap();
        assert_eq!(parsed, PathMatch::except_prefix("/launcherBadge_custom"));
        assert!(serde_json::from_str::<PathMatch>(r#"{"glob":"*"}"#).is_err());
    }
}
