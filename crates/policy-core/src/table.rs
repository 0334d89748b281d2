//! The host-keyed rule table.

use crate::{Result, Rule, RuleSet};
use policy_model::EventKind;
use std::collections::HashMap;

/// An immutable index from `(event kind, host)` to the rules that may
/// apply there, in declaration order.
///
/// Built once from a validated [`RuleSet`]; never mutated afterwards.
/// A reload builds a fresh table and swaps it in behind the engine's
/// pointer, so concurrent lookups always observe a consistent
/// snapshot. Hosts are indexed lowercased; a rule listing several
/// hosts is indexed under each of them.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
    index: HashMap<(EventKind, String), Vec<usize>>,
}

impl RuleTable {
    /// Validates the rule set and builds the index.
    pub fn build(set: RuleSet) -> Result<Self> {
        set.validate()?;
        let rules = set.rules;
        let mut index: HashMap<(EventKind, String), Vec<usize>> = HashMap::new();
        for (position, rule) in rules.iter().enumerate() {
            for host in rule.host.hosts() {
                index
                    .entry((rule.event, host.to_ascii_lowercase()))
                    .or_default()
                    .push(position);
            }
        }
        Ok(Self { rules, index })
    }

    /// The ordered sequence of rules registered for this event kind
    /// and host. The single table lookup a dispatch performs.
    pub fn lookup(&self, event: EventKind, host: &str) -> impl Iterator<Item = &Rule> {
        self.index
            .get(&(event, host.to_ascii_lowercase()))
            .into_iter()
            .flatten()
            .map(|position| &self.rules[*position])
    }

    /// All loaded rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of loaded rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are loaded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
