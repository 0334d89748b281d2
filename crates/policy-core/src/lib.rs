//! # Policy Core
//!
//! Host-agnostic policy engine for TLS/HTTP interception. An external
//! interception host owns the hard parts — SNI sniffing, certificate
//! minting, connection splicing, HTTP parsing — and calls into this
//! engine at three extension points with structured descriptors. The
//! engine resolves the applicable rules and returns a fully
//! materialized descriptor; the host decides whether to commit it.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    INTERCEPTION HOST                       │
//! │   (TLS termination, cert issuance, HTTP parse/serialize)   │
//! └───────────────┬────────────────────────────▲───────────────┘
//!                 │ Session / Request /        │ possibly-mutated
//!                 │ Response descriptor        │ descriptor
//! ┌───────────────▼────────────────────────────┴───────────────┐
//! │                      PolicyEngine                          │
//! │                                                            │
//! │   lookup(event, host) ──► RuleTable (atomic snapshot)      │
//! │   matches?            ──► policy-match predicates          │
//! │   apply chain         ──► policy-mutate interpreter        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dispatch contract
//!
//! - Exactly one rule table lookup per event (sessions key on SNI,
//!   requests on `host`, responses on `request.host`).
//! - Rules for a host apply in declaration order.
//! - Each rule's mutation chain is all-or-nothing: if any mutation
//!   fails, its partial edits are discarded, the failure is logged,
//!   and evaluation continues with the pre-rule descriptor. A single
//!   broken rule never breaks the page load.
//! - Blocking is terminal: once a chain sets `block` or
//!   `block-invisible`, nothing else runs for that event.
//! - No matching rule means pass-through identity.
//!
//! ## Reload
//!
//! The rule table is immutable once built. [`PolicyEngine::reload`]
//! swaps in a complete replacement atomically; concurrent dispatches
//! see either the fully-old or fully-new table, never a mix. A
//! malformed configuration is rejected wholesale and the previous
//! table stays live.

mod dispatch;
mod error;
mod rule;
mod table;

pub use dispatch::PolicyEngine;
pub use error::LoadError;
pub use rule::{Rule, RuleSet};
pub use table::RuleTable;

// Re-export the component types a host or rule author needs.
pub use policy_match::{HostMatch, PathMatch};
pub use policy_model::{Action, EventKind, Method, Request, Response, Session};
pub use policy_mutate::{BlockKind, JsonEdit, JsonOp, MissingPath, Mutation};

/// Result alias for configuration loading.
pub type Result<T> = std::result::Result<T, LoadError>;
