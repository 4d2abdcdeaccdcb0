//! Walk depth: a bounded edge count or the explicit `Unbounded` sentinel.

use serde::{Deserialize, Serialize};

use crate::error::ShadowScopeError;

/// Maximum number of parent edges a resolution walk may traverse.
///
/// `Unbounded` is a tag, not a large number: it never decrements and never
/// participates in arithmetic, so it cannot overflow or truncate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DepthRepr", into = "DepthRepr")]
pub enum Depth {
    Limited(u32),
    Unbounded,
}

impl Depth {
    /// Build a depth from a possibly-negative integer.
    pub fn from_signed(depth: i64) -> Result<Self, ShadowScopeError> {
        u32::try_from(depth)
            .map(Self::Limited)
            .map_err(|_| ShadowScopeError::InvalidPolicy { depth })
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// True only for `Limited(0)`.
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Limited(0))
    }

    /// Whether `traversed` edges still fit within this depth.
    pub fn permits(&self, traversed: u32) -> bool {
        match self {
            Self::Limited(max) => traversed <= *max,
            Self::Unbounded => true,
        }
    }
}

impl std::fmt::Display for Depth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{}", n),
            Self::Unbounded => f.write_str("unbounded"),
        }
    }
}

// Wire form: an integer, or the string "unbounded".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DepthRepr {
    Number(i64),
    Named(String),
}

impl TryFrom<DepthRepr> for Depth {
    type Error = ShadowScopeError;

    fn try_from(repr: DepthRepr) -> Result<Self, Self::Error> {
        match repr {
            DepthRepr::Number(n) => Depth::from_signed(n),
            DepthRepr::Named(s) => match s.trim().to_lowercase().as_str() {
                "unbounded" | "infinite" | "inf" => Ok(Depth::Unbounded),
                _ => Err(ShadowScopeError::Config(format!(
                    "depth must be an integer or \"unbounded\", got {:?}",
                    s
                ))),
            },
        }
    }
}

impl From<Depth> for DepthRepr {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Limited(n) => DepthRepr::Number(i64::from(n)),
            Depth::Unbounded => DepthRepr::Named("unbounded".to_string()),
        }
    }
}
