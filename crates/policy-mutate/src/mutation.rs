//! The declarative mutation data model.

use policy_json::JsonPath;
use policy_model::{Action, EventKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field-level edit, expressed as data.
///
/// In rule files the variant is the JSON object key
/// (externally-tagged serde form):
///
/// ```json
/// { "set_server_addr": "static.tharow.net:443" }
/// { "set_header": { "name": "Content-Type", "value": "text/plain" } }
/// { "block": "block-invisible" }
/// { "edit_json": { "edits": [ { "path": "data.myClassesEnabled", "set": true } ] } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// Rewrite the session's upstream address (SNI-based routing).
    SetServerAddr(String),

    /// Rewrite the request path (soft redirect to an inert resource).
    SetPath(String),

    /// Set a header to a value, replacing any previous value.
    SetHeader {
        /// Header name, written as it should appear on the wire.
        name: String,
        /// Header value.
        value: String,
    },

    /// Remove a header if present.
    RemoveHeader {
        /// Header name.
        name: String,
    },

    /// Override the response status code.
    SetStatus(u16),

    /// Replace the response body wholesale.
    SetBody(String),

    /// Replace the first occurrence of `marker` in the body with
    /// `replacement`. Fails when the marker is absent.
    SpliceBody {
        /// Literal substring to find.
        marker: String,
        /// Text spliced in its place.
        replacement: String,
    },

    /// Append a literal to the end of the body.
    AppendBody(String),

    /// [`Mutation::SpliceBody`] plus a preamble prepended to the whole
    /// body, separated by a newline. Used to splice a configuration
    /// loader ahead of a marker token inside a script body.
    InjectScript {
        /// Literal substring to find.
        marker: String,
        /// Text spliced in its place.
        replacement: String,
        /// Script text prepended to the body.
        preamble: String,
    },

    /// Set the descriptor's action to a blocking outcome and stop the
    /// chain.
    Block(BlockKind),

    /// Decode the body as JSON, apply path-addressed edits in order,
    /// re-encode.
    EditJson {
        /// Edits, applied in declared order.
        edits: Vec<JsonEdit>,
    },
}

impl Mutation {
    /// Variant name for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetServerAddr(_) => "set_server_addr",
            Self::SetPath(_) => "set_path",
            Self::SetHeader { .. } => "set_header",
            Self::RemoveHeader { .. } => "remove_header",
            Self::SetStatus(_) => "set_status",
            Self::SetBody(_) => "set_body",
            Self::SpliceBody { .. } => "splice_body",
            Self::AppendBody(_) => "append_body",
            Self::InjectScript { .. } => "inject_script",
            Self::Block(_) => "block",
            Self::EditJson { .. } => "edit_json",
        }
    }

    /// Whether this variant is legal for the given event kind.
    ///
    /// Sessions expose only `server_addr` and `action`; requests add
    /// `path` and headers; everything else is response-side.
    pub fn applies_to(&self, event: EventKind) -> bool {
        match self {
            Self::SetServerAddr(_) => event == EventKind::Session,
            Self::SetPath(_) => event == EventKind::Request,
            Self::SetHeader { .. } | Self::RemoveHeader { .. } => {
                matches!(event, EventKind::Request | EventKind::Response)
            }
            Self::SetStatus(_)
            | Self::SetBody(_)
            | Self::SpliceBody { .. }
            | Self::AppendBody(_)
            | Self::InjectScript { .. }
            | Self::EditJson { .. } => event == EventKind::Response,
            Self::Block(_) => true,
        }
    }
}

/// The two terminal blocking outcomes a rule may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    /// Hard drop with a visible block.
    Block,
    /// Silent drop with no user-visible error.
    BlockInvisible,
}

impl BlockKind {
    /// The descriptor action this block kind sets.
    pub fn action(&self) -> Action {
        match self {
            Self::Block => Action::Block,
            Self::BlockInvisible => Action::BlockInvisible,
        }
    }
}

/// One path-addressed edit inside an [`Mutation::EditJson`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonEdit {
    /// Dot-path into the decoded body.
    pub path: JsonPath,

    /// The operation to perform at that path.
    #[serde(flatten)]
    pub op: JsonOp,
}

/// Operation performed at a JSON path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonOp {
    /// Write the value at the path, inserting a new final key into an
    /// existing object if needed.
    Set(Value),
    /// Push the value onto the array at the path.
    Append(Value),
}

/// What a rule does when a JSON edit's path is absent from the body.
///
/// Strictness is configured per rule: bodies that vary by upstream
/// version can opt into `Skip` while everything else stays strict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPath {
    /// Treat an absent path as a rule failure (the default).
    #[default]
    Fail,
    /// Skip the edit and continue with the rest of the chain.
    Skip,
}
