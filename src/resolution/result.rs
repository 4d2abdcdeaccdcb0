//! Outcome of a resolution walk.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShadowScopeError};
use crate::tree::NodeId;

/// Why a walk ended without any node satisfying the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// The policy's depth was used up.
    ExhaustedDepth,
    /// The next edge crosses a shadow boundary the policy may not cross.
    ExhaustedBoundary,
    /// The walk needed a parent edge but stood on the root.
    ReachedRoot,
}

impl NotFoundReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExhaustedDepth => "exhausted_depth",
            Self::ExhaustedBoundary => "exhausted_boundary",
            Self::ReachedRoot => "reached_root",
        }
    }
}

impl std::fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ExhaustedDepth => "visibility depth exhausted",
            Self::ExhaustedBoundary => "walk blocked by a shadow boundary",
            Self::ReachedRoot => "reached the root of the tree",
        })
    }
}

/// Either the nearest node whose probe succeeded, or a typed miss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionResult<V> {
    Found { node: NodeId, value: V },
    NotFound(NotFoundReason),
}

impl<V> ResolutionResult<V> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// The providing node, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Found { node, .. } => Some(*node),
            Self::NotFound(_) => None,
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::NotFound(_) => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::NotFound(_) => None,
        }
    }

    pub fn reason(&self) -> Option<NotFoundReason> {
        match self {
            Self::Found { .. } => None,
            Self::NotFound(reason) => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> ResolutionResult<U> {
        match self {
            Self::Found { node, value } => ResolutionResult::Found {
                node,
                value: f(value),
            },
            Self::NotFound(reason) => ResolutionResult::NotFound(reason),
        }
    }

    /// Treat a miss as fatal, for callers whose dependency is not optional.
    pub fn into_required(self, token: impl Into<String>) -> Result<(NodeId, V)> {
        match self {
            Self::Found { node, value } => Ok((node, value)),
            Self::NotFound(reason) => Err(ShadowScopeError::NoProvider {
                token: token.into(),
                reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_accessors() {
        let r = ResolutionResult::Found {
            node: NodeId(2),
            value: "x",
        };
        assert!(r.is_found());
        assert_eq!(r.node(), Some(NodeId(2)));
        assert_eq!(r.value(), Some(&"x"));
        assert_eq!(r.reason(), None);
        assert_eq!(r.map(str::len).into_value(), Some(1));
    }

    #[test]
    fn test_not_found_accessors() {
        let r: ResolutionResult<u8> = ResolutionResult::NotFound(NotFoundReason::ReachedRoot);
        assert!(!r.is_found());
        assert_eq!(r.node(), None);
        assert_eq!(r.reason(), Some(NotFoundReason::ReachedRoot));
    }

    #[test]
    fn test_into_required() {
        let hit = ResolutionResult::Found {
            node: NodeId(0),
            value: 1,
        };
        assert_eq!(hit.into_required("T").unwrap(), (NodeId(0), 1));

        let miss: ResolutionResult<i32> =
            ResolutionResult::NotFound(NotFoundReason::ExhaustedDepth);
        let err = miss.into_required("T").unwrap_err();
        assert!(matches!(
            err,
            ShadowScopeError::NoProvider {
                reason: NotFoundReason::ExhaustedDepth,
                ..
            }
        ));
    }

    #[test]
    fn test_json_shape() {
        let hit = ResolutionResult::Found {
            node: NodeId(3),
            value: "dark",
        };
        assert_eq!(
            serde_json::to_value(&hit).unwrap(),
            serde_json::json!({ "found": { "node": 3, "value": "dark" } })
        );
        let miss: ResolutionResult<()> =
            ResolutionResult::NotFound(NotFoundReason::ExhaustedBoundary);
        assert_eq!(
            serde_json::to_value(&miss).unwrap(),
            serde_json::json!({ "not_found": "exhausted_boundary" })
        );
    }
}
