//! ShadowScope: visibility-scoped dependency resolution for component trees.
//!
//! Components form a tree whose edges may cross shadow boundaries. A
//! dependency request carries a [`VisibilityPolicy`]; the
//! [`ResolutionWalker`] walks up from the requesting node under that policy
//! and reports the nearest node whose injector satisfies the request, or a
//! typed reason why none could.

pub mod cli;
pub mod config;
pub mod error;
pub mod injector;
pub mod observability;
pub mod policy;
pub mod resolution;
pub mod tree;

pub use error::{Result, ShadowScopeError};
pub use injector::{LocalInjector, Probe};
pub use policy::{Depth, PolicyKind, VisibilityPolicy};
pub use resolution::{NotFoundReason, ResolutionResult, ResolutionWalker};
pub use tree::{ComponentTree, NodeId, TreeEdge, TreeView};
