//! Visibility policy model: depth and shadow-boundary rules for a walk.

pub mod depth;
pub mod visibility;

pub use depth::Depth;
pub use visibility::{PolicyKind, VisibilityPolicy};
