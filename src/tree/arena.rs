//! Arena-backed component tree.
//!
//! Nodes live in a `Vec` indexed by [`NodeId`]. Detaching a node marks its
//! whole subtree as detached instead of freeing slots, so ids stay unique
//! for the lifetime of the tree.

use std::collections::HashMap;

use tracing::debug;

use super::node::{NodeId, TreeEdge, TreeNode};
use super::TreeView;
use crate::error::{Result, ShadowScopeError};
use crate::injector::LocalInjector;

/// Single-writer component tree. Structural mutation needs `&mut self`, so
/// concurrent walks over a shared `&ComponentTree` always see a consistent
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct ComponentTree {
    nodes: Vec<TreeNode>,
    children: HashMap<NodeId, Vec<NodeId>>,
    root: Option<NodeId>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root node. A tree has at most one attached root.
    pub fn add_root(&mut self) -> Result<NodeId> {
        if self.root.is_some() {
            return Err(ShadowScopeError::RootExists);
        }
        let id = self.push(None);
        self.root = Some(id);
        Ok(id)
    }

    /// Attach a new child under `parent`. `boundary` marks the new edge as a
    /// shadow boundary.
    pub fn add_child(&mut self, parent: NodeId, boundary: bool) -> Result<NodeId> {
        self.ensure_attached(parent)?;
        let id = self.push(Some(TreeEdge::new(parent, boundary)));
        self.children.entry(parent).or_default().push(id);
        Ok(id)
    }

    /// Give `node` its local injector, replacing any previous one.
    pub fn attach_injector(&mut self, node: NodeId, injector: LocalInjector) -> Result<()> {
        self.ensure_attached(node)?;
        self.nodes[node.index()].injector = Some(injector);
        Ok(())
    }

    /// Detach `node` and its entire subtree. Returns the number of nodes
    /// detached.
    pub fn detach(&mut self, node: NodeId) -> Result<usize> {
        self.ensure_attached(node)?;

        if let Some(parent) = self.nodes[node.index()].parent() {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|&c| c != node);
            }
        }
        if self.root == Some(node) {
            self.root = None;
        }

        let mut stack = vec![node];
        let mut count = 0;
        while let Some(current) = stack.pop() {
            self.nodes[current.index()].attached = false;
            count += 1;
            if let Some(kids) = self.children.remove(&current) {
                stack.extend(kids);
            }
        }
        debug!(node = %node, detached = count, "detached subtree");
        Ok(count)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    pub fn injector(&self, id: NodeId) -> Option<&LocalInjector> {
        self.node(id)
            .filter(|n| n.is_attached())
            .and_then(|n| n.injector())
    }

    /// Children of `node`, in attachment order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.children.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of edges between `node` and the root.
    pub fn depth_of(&self, node: NodeId) -> Result<usize> {
        self.ensure_attached(node)?;
        Ok(self.ancestors(node).count())
    }

    /// Iterate the ancestors of `node`, nearest first. The node itself is
    /// not included.
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(node),
        }
    }

    /// Number of attached nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_attached()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attached node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|n| n.is_attached())
            .map(|n| n.id())
    }

    fn push(&mut self, edge: Option<TreeEdge>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode::new(id, edge));
        id
    }
}

impl TreeView for ComponentTree {
    fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(TreeNode::is_attached)
    }

    fn edge_to_parent(&self, node: NodeId) -> Option<TreeEdge> {
        self.node(node)
            .filter(|n| n.is_attached())
            .and_then(TreeNode::edge_to_parent)
    }

    fn ensure_attached(&self, node: NodeId) -> Result<()> {
        match self.node(node) {
            Some(n) if n.is_attached() => Ok(()),
            Some(_) => Err(ShadowScopeError::DetachedNode(node)),
            None => Err(ShadowScopeError::UnknownNode(node)),
        }
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a ComponentTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
