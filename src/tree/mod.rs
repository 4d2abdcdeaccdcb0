//! Component tree substrate: nodes, parent edges, and shadow boundaries.
//!
//! The resolution walker only needs the read-only [`TreeView`] surface, so
//! any tree representation can be walked. [`ComponentTree`] is the arena
//! implementation used by the config loader, the CLI, and the tests.

pub mod arena;
pub mod node;

pub use arena::{Ancestors, ComponentTree};
pub use node::{NodeId, TreeEdge, TreeNode};

use crate::error::{Result, ShadowScopeError};

/// Read-only view of a component tree.
///
/// Implementations must be acyclic along parent edges: following
/// `edge_to_parent` from any attached node reaches a root in finitely many
/// steps.
pub trait TreeView {
    /// Whether `node` is currently attached to this tree.
    fn contains(&self, node: NodeId) -> bool;

    /// The edge to `node`'s parent, or `None` at the root.
    fn edge_to_parent(&self, node: NodeId) -> Option<TreeEdge>;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.edge_to_parent(node).map(|edge| edge.parent())
    }

    /// Fail unless `node` may start a resolution walk.
    fn ensure_attached(&self, node: NodeId) -> Result<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(ShadowScopeError::UnknownNode(node))
        }
    }
}

impl<T: TreeView + ?Sized> TreeView for &T {
    fn contains(&self, node: NodeId) -> bool {
        (**self).contains(node)
    }

    fn edge_to_parent(&self, node: NodeId) -> Option<TreeEdge> {
        (**self).edge_to_parent(node)
    }

    fn ensure_attached(&self, node: NodeId) -> Result<()> {
        (**self).ensure_attached(node)
    }
}
