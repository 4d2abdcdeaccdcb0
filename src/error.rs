//! Crate-wide error type.
//!
//! Only construction and misuse are errors. A resolution walk that finds no
//! provider is an ordinary [`ResolutionResult::NotFound`] value, never an
//! `Err`.
//!
//! [`ResolutionResult::NotFound`]: crate::resolution::ResolutionResult::NotFound

use crate::resolution::NotFoundReason;
use crate::tree::NodeId;

/// Errors produced while building policies, trees, or loading config.
#[derive(Debug, thiserror::Error)]
pub enum ShadowScopeError {
    #[error("invalid visibility policy: depth {depth} is out of range")]
    InvalidPolicy { depth: i64 },

    #[error("unknown visibility policy: {0:?}")]
    UnknownPolicy(String),

    #[error("node {0} does not belong to this tree")]
    UnknownNode(NodeId),

    #[error("node {0} has been detached from the tree")]
    DetachedNode(NodeId),

    #[error("tree already has a root node")]
    RootExists,

    #[error("duplicate node name: {0:?}")]
    DuplicateNodeName(String),

    #[error("unknown node name: {0:?}")]
    UnknownNodeName(String),

    #[error("no provider for {token:?}: {reason}")]
    NoProvider {
        token: String,
        reason: NotFoundReason,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShadowScopeError>;
