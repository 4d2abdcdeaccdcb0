//! Node identity, parent edges, and per-node storage.

use serde::{Deserialize, Serialize};

use crate::injector::LocalInjector;

/// Opaque, stable handle for a node in a [`ComponentTree`].
///
/// Ids are never reused within one tree, so a handle to a detached node
/// stays distinguishable from every live node.
///
/// [`ComponentTree`]: super::ComponentTree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The edge from a node to its parent. Boundary status is fixed when the
/// edge is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeEdge {
    parent: NodeId,
    boundary: bool,
}

impl TreeEdge {
    pub fn new(parent: NodeId, boundary: bool) -> Self {
        Self { parent, boundary }
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// True when this edge crosses a shadow boundary.
    pub fn is_boundary_crossing(&self) -> bool {
        self.boundary
    }
}

/// Storage for one node. The node owns its parent edge and its local
/// injector; the parent → children direction is a non-owning index kept by
/// the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) edge: Option<TreeEdge>,
    pub(crate) injector: Option<LocalInjector>,
    pub(crate) attached: bool,
}

impl TreeNode {
    pub(crate) fn new(id: NodeId, edge: Option<TreeEdge>) -> Self {
        Self {
            id,
            edge,
            injector: None,
            attached: true,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn edge_to_parent(&self) -> Option<TreeEdge> {
        self.edge
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.edge.map(|e| e.parent)
    }

    pub fn injector(&self) -> Option<&LocalInjector> {
        self.injector.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_root(&self) -> bool {
        self.edge.is_none()
    }
}
