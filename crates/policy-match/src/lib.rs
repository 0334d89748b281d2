//! # Policy Match
//!
//! Match predicates evaluated against descriptor fields. A rule
//! combines a [`HostMatch`] (mandatory), an optional [`PathMatch`],
//! and an optional method constraint; this crate owns the first two.
//!
//! Matching never errors. A predicate that has nothing to match
//! against simply does not match.

mod host;
mod path;

pub use host::HostMatch;
pub use path::PathMatch;
