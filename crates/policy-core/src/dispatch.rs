//! The policy dispatcher: the three host-invoked entry points.

use crate::{Result, Rule, RuleSet, RuleTable};
use policy_model::{EventKind, Request, Response, Session};
use policy_mutate::{Applied, MutateError};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// The policy engine a host embeds.
///
/// Dispatch is read-then-write: the engine never mutates the caller's
/// descriptor in place — each entry point consumes a descriptor and
/// returns a fully materialized replacement, so the host decides
/// whether and when to commit it. Dispatch is pure and synchronous:
/// no I/O, no clocks, no randomness. The engine itself is `Sync`;
/// the host may dispatch from arbitrarily many connections in
/// parallel, and only [`PolicyEngine::reload`] ever takes the write
/// side of the table lock.
pub struct PolicyEngine {
    table: RwLock<Arc<RuleTable>>,
}

impl PolicyEngine {
    /// Builds an engine from a validated rule set.
    pub fn new(set: RuleSet) -> Result<Self> {
        let table = Arc::new(RuleTable::build(set)?);
        info!(rules = table.len(), "policy engine initialized");
        Ok(Self {
            table: RwLock::new(table),
        })
    }

    /// Parses a JSON rule document and builds an engine from it.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::new(RuleSet::from_json_str(raw)?)
    }

    /// Loads a rule file and builds an engine from it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(RuleSet::from_path(path)?)
    }

    /// Atomically replaces the rule table.
    ///
    /// The replacement is validated and built before the swap; on any
    /// error the previous table stays live and untouched. In-flight
    /// dispatches keep the snapshot they already hold.
    pub fn reload(&self, set: RuleSet) -> Result<()> {
        let table = Arc::new(RuleTable::build(set)?);
        info!(rules = table.len(), "rule table reloaded");
        *write_lock(&self.table) = table;
        Ok(())
    }

    /// The table snapshot this dispatch will use throughout.
    fn snapshot(&self) -> Arc<RuleTable> {
        read_lock(&self.table).clone()
    }

    /// `OnTLSSessionStart`: invoked at handshake time, before HTTP
    /// visibility. Keyed on the session's SNI; used for SNI-based
    /// routing via `set_server_addr`.
    pub fn on_tls_session_start(&self, session: Session) -> Session {
        let table = self.snapshot();
        let sni = session.sni.clone();
        debug!(%sni, "dispatching session event");
        let mut current = session;
        for rule in table.lookup(EventKind::Session, &sni) {
            if !rule.matches_session(&current) {
                continue;
            }
            match apply_rule(rule, &mut current, |rule, session| {
                chain(rule, |m| policy_mutate::apply_session(m, session))
            }) {
                RuleOutcome::Continue => {}
                RuleOutcome::Blocked => break,
            }
        }
        current
    }

    /// `OnRequest`: invoked once per parsed HTTP request. Keyed on
    /// the request host; may block the request outright or rewrite
    /// its path, but never fabricates a response body.
    pub fn on_request(&self, request: Request) -> Request {
        let table = self.snapshot();
        let host = request.host.clone();
        debug!(%host, path = %request.path, "dispatching request event");
        let mut current = request;
        for rule in table.lookup(EventKind::Request, &host) {
            if !rule.matches_request(&current) {
                continue;
            }
            match apply_rule(rule, &mut current, |rule, request| {
                chain(rule, |m| policy_mutate::apply_request(m, request))
            }) {
                RuleOutcome::Continue => {}
                RuleOutcome::Blocked => break,
            }
        }
        current
    }

    /// `OnResponse`: invoked once per upstream response. Keyed on the
    /// originating request's host; the richest path — JSON body
    /// edits, wholesale status/body/header overrides, script
    /// injection.
    pub fn on_response(&self, response: Response) -> Response {
        let table = self.snapshot();
        let host = response.request.host.clone();
        debug!(%host, path = %response.request.path, "dispatching response event");
        let mut current = response;
        for rule in table.lookup(EventKind::Response, &host) {
            if !rule.matches_response(&current) {
                continue;
            }
            let missing = rule.on_missing_path;
            match apply_rule(rule, &mut current, move |rule, response| {
                chain(rule, |m| policy_mutate::apply_response(m, response, missing))
            }) {
                RuleOutcome::Continue => {}
                RuleOutcome::Blocked => break,
            }
        }
        current
    }
}

enum RuleOutcome {
    Continue,
    Blocked,
}

/// Runs one rule's chain against a scratch clone of the descriptor.
///
/// On success the clone replaces the descriptor; on failure the
/// partial edits are dropped, the failure is logged, and the
/// pre-rule value stands (all-or-nothing per rule).
fn apply_rule<D, F>(rule: &Rule, current: &mut D, run: F) -> RuleOutcome
where
    D: Clone,
    F: FnOnce(&Rule, &mut D) -> std::result::Result<Applied, MutateError>,
{
    let mut candidate = current.clone();
    match run(rule, &mut candidate) {
        Ok(Applied::Continue) => {
            debug!(rule = %rule.id, "rule applied");
            *current = candidate;
            RuleOutcome::Continue
        }
        Ok(Applied::Blocked) => {
            debug!(rule = %rule.id, "rule blocked event");
            *current = candidate;
            RuleOutcome::Blocked
        }
        Err(err) => {
            warn!(rule = %rule.id, error = %err, "rule failed to apply; descriptor left unmodified");
            RuleOutcome::Continue
        }
    }
}

/// Applies a rule's mutations in declared order, stopping at a block.
fn chain<F>(rule: &Rule, mut apply: F) -> std::result::Result<Applied, MutateError>
where
    F: FnMut(&policy_mutate::Mutation) -> std::result::Result<Applied, MutateError>,
{
    for mutation in &rule.mutations {
        if let Applied::Blocked = apply(mutation)? {
            return Ok(Applied::Blocked);
        }
    }
    Ok(Applied::Continue)
}

// Lock poisoning only happens if a panic escaped a prior dispatch;
// the table itself is still consistent, so keep serving it.
fn read_lock<'a, T>(lock: &'a RwLock<T>) -> std::sync::RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<'a, T>(lock: &'a RwLock<T>) -> std::sync::RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
