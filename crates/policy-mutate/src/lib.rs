//! # Policy Mutate
//!
//! The mutation engine: a small typed interpreter over declarative
//! field edits. Each [`Mutation`] is a pure function of the
//! descriptor it applies to; there is no external state, so
//! re-applying a mutation to its own output is a no-op delta.
//!
//! ## Mutation algebra
//!
//! | Variant | Applies to | May fail with |
//! |---------|-----------|---------------|
//! | `SetServerAddr` | session | — |
//! | `SetPath` | request | — |
//! | `SetHeader` / `RemoveHeader` | request, response | — |
//! | `SetStatus` / `SetBody` / `AppendBody` | response | — |
//! | `SpliceBody` / `InjectScript` | response | `MarkerNotFound` |
//! | `EditJson` | response | `InvalidJsonBody`, `JsonPathNotFound`, `NotAnArray` |
//! | `Block` | any | — (terminal) |
//!
//! `Block` short-circuits: [`apply_session`], [`apply_request`] and
//! [`apply_response`] report [`Applied::Blocked`], and the caller
//! must not run any further mutation for that event.
//!
//! Which variants are legal for which event kind is also enforced at
//! configuration load; the runtime check here exists so a mismatch
//! still fails closed instead of silently corrupting a descriptor.

mod engine;
mod error;
mod mutation;

pub use engine::{apply_request, apply_response, apply_session, Applied};
pub use error::MutateError;
pub use mutation::{BlockKind, JsonEdit, JsonOp, MissingPath, Mutation};

/// Result alias for mutation application.
pub type Result<T> = std::result::Result<T, MutateError>;
