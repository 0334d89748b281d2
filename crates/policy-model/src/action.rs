//! Outcome actions and HTTP methods.

use serde::{Deserialize, Serialize};

/// The logical outcome attached to a descriptor.
///
/// Every descriptor carries exactly one action. The host interprets
/// `Block` as a hard drop (connection reset or block page) and
/// `BlockInvisible` as a silent drop with no user-visible error.
/// `Modify` marks a descriptor whose fields were rewritten in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Let the event proceed unchanged.
    #[default]
    Allow,
    /// Drop the event with a visible block.
    Block,
    /// Drop the event without any user-visible error.
    BlockInvisible,
    /// The descriptor was rewritten; deliver the modified value.
    Modify,
}

impl Action {
    /// Returns true for the two terminal blocking outcomes.
    ///
    /// Once a dispatch reaches a blocking action, no further mutation
    /// in that dispatch may touch the descriptor.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Block | Self::BlockInvisible)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Block => write!(f, "block"),
            Self::BlockInvisible => write!(f, "block-invisible"),
            Self::Modify => write!(f, "modify"),
        }
    }
}

/// HTTP methods visible to the policy layer.
///
/// The interception host only surfaces the methods a bumped TLS flow
/// can carry; anything else never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Connect,
    Options,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Connect => write!(f, "CONNECT"),
            Self::Options => write!(f, "OPTIONS"),
        }
    }
}
