//! Visibility policies attached to dependency requests.
//!
//! A policy is an immutable `(depth, cross_boundaries)` pair. Four canonical
//! policies cover every current caller:
//!
//! | policy      | depth     | crosses shadow boundaries |
//! |-------------|-----------|---------------------------|
//! | `SELF`      | 0         | no                        |
//! | `PARENT`    | 1         | no                        |
//! | `ANCESTOR`  | unbounded | no                        |
//! | `UNBOUNDED` | unbounded | yes                       |
//!
//! Any other pair is a [`PolicyKind::Custom`] policy and walks by the same
//! rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::depth::Depth;
use crate::error::ShadowScopeError;

// ---------------------------------------------------------------------------
// VisibilityPolicy
// ---------------------------------------------------------------------------

/// How far, and across which kinds of edges, a resolution walk may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PolicyRepr", into = "PolicyRepr")]
pub struct VisibilityPolicy {
    depth: Depth,
    cross_boundaries: bool,
}

impl VisibilityPolicy {
    /// Only the requesting node's own injector.
    pub const SELF: Self = Self::bounded(0, false);
    /// Only the immediate parent, and never across a shadow boundary.
    pub const PARENT: Self = Self::bounded(1, false);
    /// Any ancestor within the requesting node's shadow scope.
    pub const ANCESTOR: Self = Self::unbounded(false);
    /// Any ancestor up to the root, across shadow boundaries.
    pub const UNBOUNDED: Self = Self::unbounded(true);

    /// Validating constructor for depths coming from untyped sources.
    pub fn new(depth: i64, cross_boundaries: bool) -> Result<Self, ShadowScopeError> {
        Ok(Self {
            depth: Depth::from_signed(depth)?,
            cross_boundaries,
        })
    }

    pub const fn bounded(depth: u32, cross_boundaries: bool) -> Self {
        Self {
            depth: Depth::Limited(depth),
            cross_boundaries,
        }
    }

    pub const fn unbounded(cross_boundaries: bool) -> Self {
        Self {
            depth: Depth::Unbounded,
            cross_boundaries,
        }
    }

    pub const fn with_depth(depth: Depth, cross_boundaries: bool) -> Self {
        Self {
            depth,
            cross_boundaries,
        }
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn cross_boundaries(&self) -> bool {
        self.cross_boundaries
    }

    /// True iff the policy resolves against the requesting node itself,
    /// i.e. its depth is zero.
    pub fn includes_self(&self) -> bool {
        self.depth.is_zero()
    }

    pub fn kind(&self) -> PolicyKind {
        match *self {
            Self::SELF => PolicyKind::SelfOnly,
            Self::PARENT => PolicyKind::Parent,
            Self::ANCESTOR => PolicyKind::Ancestor,
            Self::UNBOUNDED => PolicyKind::Unbounded,
            _ => PolicyKind::Custom,
        }
    }

    /// Parse a canonical policy name (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "self" | "self-only" | "self_only" => Some(Self::SELF),
            "parent" => Some(Self::PARENT),
            "ancestor" => Some(Self::ANCESTOR),
            "unbounded" => Some(Self::UNBOUNDED),
            _ => None,
        }
    }
}

impl FromStr for VisibilityPolicy {
    type Err = ShadowScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_loose(s).ok_or_else(|| ShadowScopeError::UnknownPolicy(s.to_string()))
    }
}

impl std::fmt::Display for VisibilityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind().canonical_name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "custom(depth={}, cross_boundaries={})",
                self.depth, self.cross_boundaries
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// PolicyKind
// ---------------------------------------------------------------------------

/// Classification of a policy against the canonical set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    #[serde(rename = "self")]
    SelfOnly,
    Parent,
    Ancestor,
    Unbounded,
    Custom,
}

impl PolicyKind {
    pub fn canonical_name(&self) -> Option<&'static str> {
        match self {
            Self::SelfOnly => Some("self"),
            Self::Parent => Some("parent"),
            Self::Ancestor => Some("ancestor"),
            Self::Unbounded => Some("unbounded"),
            Self::Custom => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde representation
// ---------------------------------------------------------------------------

// A canonical name (`ancestor`) or explicit fields
// (`{ depth: 3, cross_boundaries: true }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Named(String),
    Fields {
        depth: Depth,
        #[serde(default)]
        cross_boundaries: bool,
    },
}

impl TryFrom<PolicyRepr> for VisibilityPolicy {
    type Error = ShadowScopeError;

    fn try_from(repr: PolicyRepr) -> Result<Self, Self::Error> {
        match repr {
            PolicyRepr::Named(name) => name.parse(),
            PolicyRepr::Fields {
                depth,
                cross_boundaries,
            } => Ok(Self::with_depth(depth, cross_boundaries)),
        }
    }
}

impl From<VisibilityPolicy> for PolicyRepr {
    fn from(policy: VisibilityPolicy) -> Self {
        match policy.kind().canonical_name() {
            Some(name) => PolicyRepr::Named(name.to_string()),
            None => PolicyRepr::Fields {
                depth: policy.depth,
                cross_boundaries: policy.cross_boundaries,
            },
        }
    }
}
