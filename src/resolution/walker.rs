//! The resolution walk.
//!
//! Given a start node and a [`VisibilityPolicy`], the walk moves up the
//! single ancestor chain one parent edge at a time:
//!
//! 1. A depth-zero policy probes the start node and stops. No edge is ever
//!    inspected.
//! 2. Every other policy skips the start node. Before each step it reads the
//!    edge to the parent: no edge ends the walk with `ReachedRoot`; a
//!    boundary edge the policy may not cross ends it with
//!    `ExhaustedBoundary`. Otherwise the walk steps to the parent, spends one
//!    unit of depth, and probes it.
//! 3. When a bounded depth is spent without a hit the walk ends with
//!    `ExhaustedDepth`.
//!
//! The first successful probe wins. Walks terminate in at most
//! `depth(start) + 1` steps on any acyclic tree.

use serde::Serialize;
use tracing::{debug, trace};

use super::result::{NotFoundReason, ResolutionResult};
use crate::error::Result;
use crate::injector::Probe;
use crate::policy::{Depth, VisibilityPolicy};
use crate::tree::{NodeId, TreeView};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One step of a walk: probe a node, or stop for a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkStep {
    Probe(NodeId),
    Stop(NotFoundReason),
}

/// Every node a walk would probe if all probes failed, and how it would end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkPlan {
    pub policy: VisibilityPolicy,
    pub start: NodeId,
    pub candidates: Vec<NodeId>,
    pub terminal: NotFoundReason,
}

/// A resolution result plus the nodes probed to reach it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TracedResolution<V> {
    pub result: ResolutionResult<V>,
    pub probed: Vec<NodeId>,
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Transient traversal state for one walk.
#[derive(Debug, Clone)]
pub struct WalkCursor<'t, T: TreeView + ?Sized> {
    tree: &'t T,
    policy: VisibilityPolicy,
    current: NodeId,
    remaining: Depth,
    started: bool,
    stopped: Option<NotFoundReason>,
}

impl<'t, T: TreeView + ?Sized> WalkCursor<'t, T> {
    fn new(tree: &'t T, policy: VisibilityPolicy, start: NodeId) -> Self {
        Self {
            tree,
            policy,
            current: start,
            remaining: policy.depth(),
            started: false,
            stopped: None,
        }
    }

    /// Advance one step. Once a `Stop` is returned, every later call returns
    /// the same `Stop`.
    pub fn advance(&mut self) -> WalkStep {
        if let Some(reason) = self.stopped {
            return WalkStep::Stop(reason);
        }

        if !self.started {
            self.started = true;
            if self.policy.includes_self() {
                return WalkStep::Probe(self.current);
            }
        }

        if self.remaining.is_zero() {
            return self.stop(NotFoundReason::ExhaustedDepth);
        }

        let Some(edge) = self.tree.edge_to_parent(self.current) else {
            return self.stop(NotFoundReason::ReachedRoot);
        };

        if edge.is_boundary_crossing() && !self.policy.cross_boundaries() {
            return self.stop(NotFoundReason::ExhaustedBoundary);
        }

        self.current = edge.parent();
        if let Depth::Limited(n) = self.remaining {
            self.remaining = Depth::Limited(n - 1);
        }
        WalkStep::Probe(self.current)
    }

    fn stop(&mut self, reason: NotFoundReason) -> WalkStep {
        self.stopped = Some(reason);
        WalkStep::Stop(reason)
    }
}

impl<T: TreeView + ?Sized> Iterator for WalkCursor<'_, T> {
    type Item = WalkStep;

    /// Yields every step including the final `Stop`, then ends.
    fn next(&mut self) -> Option<WalkStep> {
        if self.stopped.is_some() {
            return None;
        }
        Some(self.advance())
    }
}

// ---------------------------------------------------------------------------
// ResolutionWalker
// ---------------------------------------------------------------------------

/// Walks a tree under one visibility policy.
///
/// Holds only shared references, so one walker can serve any number of
/// concurrent resolutions over an unchanging tree.
#[derive(Debug, Clone)]
pub struct ResolutionWalker<'t, T: TreeView + ?Sized> {
    tree: &'t T,
    policy: VisibilityPolicy,
}

impl<'t, T: TreeView + ?Sized> ResolutionWalker<'t, T> {
    pub fn new(tree: &'t T, policy: VisibilityPolicy) -> Self {
        Self { tree, policy }
    }

    pub fn policy(&self) -> VisibilityPolicy {
        self.policy
    }

    /// Step-by-step cursor starting at `start`.
    pub fn cursor(&self, start: NodeId) -> Result<WalkCursor<'t, T>> {
        self.tree.ensure_attached(start)?;
        Ok(WalkCursor::new(self.tree, self.policy, start))
    }

    /// Resolve `request` starting at `start`.
    ///
    /// Misses come back as `Ok(ResolutionResult::NotFound(_))`; `Err` only
    /// signals that `start` is not an attached node.
    pub fn resolve<R, P>(
        &self,
        start: NodeId,
        request: &R,
        probe: &P,
    ) -> Result<ResolutionResult<P::Value>>
    where
        R: ?Sized,
        P: Probe<R> + ?Sized,
    {
        self.run(start, request, probe, |_| {})
    }

    /// Like [`resolve`](Self::resolve), also recording every probed node.
    pub fn resolve_with_trace<R, P>(
        &self,
        start: NodeId,
        request: &R,
        probe: &P,
    ) -> Result<TracedResolution<P::Value>>
    where
        R: ?Sized,
        P: Probe<R> + ?Sized,
    {
        let mut probed = Vec::new();
        let result = self.run(start, request, probe, |node| probed.push(node))?;
        Ok(TracedResolution { result, probed })
    }

    /// The candidates this walk would probe if every probe failed.
    pub fn plan(&self, start: NodeId) -> Result<WalkPlan> {
        let mut candidates = Vec::new();
        let mut cursor = self.cursor(start)?;
        let terminal = loop {
            match cursor.advance() {
                WalkStep::Probe(node) => candidates.push(node),
                WalkStep::Stop(reason) => break reason,
            }
        };
        trace!(
            start = %start,
            policy = %self.policy,
            candidates = candidates.len(),
            terminal = terminal.as_str(),
            "planned walk"
        );
        Ok(WalkPlan {
            policy: self.policy,
            start,
            candidates,
            terminal,
        })
    }

    fn run<R, P>(
        &self,
        start: NodeId,
        request: &R,
        probe: &P,
        mut on_probe: impl FnMut(NodeId),
    ) -> Result<ResolutionResult<P::Value>>
    where
        R: ?Sized,
        P: Probe<R> + ?Sized,
    {
        let mut cursor = self.cursor(start)?;
        loop {
            match cursor.advance() {
                WalkStep::Probe(node) => {
                    on_probe(node);
                    if let Some(value) = probe.probe(node, request) {
                        debug!(start = %start, node = %node, policy = %self.policy, "resolved");
                        return Ok(ResolutionResult::Found { node, value });
                    }
                    trace!(node = %node, "probe missed");
                }
                WalkStep::Stop(reason) => {
                    debug!(start = %start, policy = %self.policy, reason = reason.as_str(), "not found");
                    return Ok(ResolutionResult::NotFound(reason));
                }
            }
        }
    }
}

/// Resolve with a one-off walker.
pub fn resolve<T, R, P>(
    tree: &T,
    start: NodeId,
    policy: VisibilityPolicy,
    request: &R,
    probe: &P,
) -> Result<ResolutionResult<P::Value>>
where
    T: TreeView + ?Sized,
    R: ?Sized,
    P: Probe<R> + ?Sized,
{
    ResolutionWalker::new(tree, policy).resolve(start, request, probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShadowScopeError;
    use crate::tree::ComponentTree;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use test_case::test_case;

    /// root ─ a ═ b ─ c, where `═` is a shadow boundary.
    fn shadowed_chain() -> (ComponentTree, [NodeId; 4]) {
        let mut tree = ComponentTree::new();
        let root = tree.add_root().unwrap();
        let a = tree.add_child(root, false).unwrap();
        let b = tree.add_child(a, true).unwrap();
        let c = tree.add_child(b, false).unwrap();
        (tree, [root, a, b, c])
    }

    fn never(_: NodeId, _: &str) -> Option<()> {
        None
    }

    #[test_case(VisibilityPolicy::SELF, &[3], NotFoundReason::ExhaustedDepth ; "self")]
    #[test_case(VisibilityPolicy::PARENT, &[2], NotFoundReason::ExhaustedDepth ; "parent")]
    #[test_case(VisibilityPolicy::ANCESTOR, &[2], NotFoundReason::ExhaustedBoundary ; "ancestor")]
    #[test_case(VisibilityPolicy::UNBOUNDED, &[2, 1, 0], NotFoundReason::ReachedRoot ; "unbounded")]
    #[test_case(VisibilityPolicy::bounded(2, true), &[2, 1], NotFoundReason::ExhaustedDepth ; "custom two crossing")]
    #[test_case(VisibilityPolicy::bounded(5, true), &[2, 1, 0], NotFoundReason::ReachedRoot ; "custom deep crossing")]
    fn plan_from_leaf(policy: VisibilityPolicy, expected: &[usize], terminal: NotFoundReason) {
        let (tree, ids) = shadowed_chain();
        let plan = ResolutionWalker::new(&tree, policy).plan(ids[3]).unwrap();
        let expected: Vec<NodeId> = expected.iter().map(|&i| ids[i]).collect();
        assert_eq!(plan.candidates, expected);
        assert_eq!(plan.terminal, terminal);
    }

    #[test]
    fn test_parent_blocked_by_boundary_even_if_parent_provides() {
        let (tree, ids) = shadowed_chain();
        let probe = |node: NodeId, _: &str| (node == ids[1]).then_some("a");
        let traced = ResolutionWalker::new(&tree, VisibilityPolicy::PARENT)
            .resolve_with_trace(ids[2], "T", &probe)
            .unwrap();
        assert_eq!(
            traced.result,
            ResolutionResult::NotFound(NotFoundReason::ExhaustedBoundary)
        );
        assert!(traced.probed.is_empty());
    }

    #[test]
    fn test_start_node_not_probed_unless_self() {
        let (tree, ids) = shadowed_chain();
        let everywhere = |_: NodeId, _: &str| Some(());
        for policy in [
            VisibilityPolicy::PARENT,
            VisibilityPolicy::ANCESTOR,
            VisibilityPolicy::UNBOUNDED,
        ] {
            let result = resolve(&tree, ids[3], policy, "T", &everywhere).unwrap();
            assert_eq!(result.node(), Some(ids[2]), "policy {}", policy);
        }
        let result = resolve(&tree, ids[3], VisibilityPolicy::SELF, "T", &everywhere).unwrap();
        assert_eq!(result.node(), Some(ids[3]));
    }

    #[test]
    fn test_nearest_match_wins() {
        let (tree, ids) = shadowed_chain();
        let calls = RefCell::new(Vec::new());
        let probe = |node: NodeId, _: &str| {
            calls.borrow_mut().push(node);
            (node == ids[1] || node == ids[0]).then_some(node.index())
        };
        let result = resolve(&tree, ids[3], VisibilityPolicy::UNBOUNDED, "T", &probe).unwrap();
        assert_eq!(
            result,
            ResolutionResult::Found {
                node: ids[1],
                value: ids[1].index()
            }
        );
        assert_eq!(*calls.borrow(), vec![ids[2], ids[1]]);
    }

    #[test]
    fn test_self_on_lone_root_is_exhausted_depth() {
        let mut tree = ComponentTree::new();
        let root = tree.add_root().unwrap();
        let result = resolve(&tree, root, VisibilityPolicy::SELF, "T", &never).unwrap();
        assert_eq!(
            result,
            ResolutionResult::NotFound(NotFoundReason::ExhaustedDepth)
        );
    }

    #[test]
    fn test_cursor_repeats_stop() {
        let (tree, ids) = shadowed_chain();
        let mut cursor = ResolutionWalker::new(&tree, VisibilityPolicy::PARENT)
            .cursor(ids[0])
            .unwrap();
        assert_eq!(cursor.advance(), WalkStep::Stop(NotFoundReason::ReachedRoot));
        assert_eq!(cursor.advance(), WalkStep::Stop(NotFoundReason::ReachedRoot));
    }

    #[test]
    fn test_cursor_iterator_ends_after_stop() {
        let (tree, ids) = shadowed_chain();
        let steps: Vec<_> = ResolutionWalker::new(&tree, VisibilityPolicy::SELF)
            .cursor(ids[1])
            .unwrap()
            .collect();
        assert_eq!(
            steps,
            vec![
                WalkStep::Probe(ids[1]),
                WalkStep::Stop(NotFoundReason::ExhaustedDepth)
            ]
        );
    }

    #[test]
    fn test_detached_start_is_an_error() {
        let (mut tree, ids) = shadowed_chain();
        tree.detach(ids[2]).unwrap();
        let err = resolve(&tree, ids[3], VisibilityPolicy::ANCESTOR, "T", &never).unwrap_err();
        assert!(matches!(err, ShadowScopeError::DetachedNode(n) if n == ids[3]));
    }

    #[test]
    fn test_walk_over_custom_tree_view() {
        use crate::tree::TreeEdge;

        // Parent of n is n - 1; every third edge is a boundary.
        struct Ladder(u32);
        impl TreeView for Ladder {
            fn contains(&self, node: NodeId) -> bool {
                node.0 < self.0
            }
            fn edge_to_parent(&self, node: NodeId) -> Option<TreeEdge> {
                (node.0 > 0).then(|| TreeEdge::new(NodeId(node.0 - 1), node.0 % 3 == 0))
            }
        }

        let ladder = Ladder(10);
        let plan = ResolutionWalker::new(&ladder, VisibilityPolicy::ANCESTOR)
            .plan(NodeId(8))
            .unwrap();
        assert_eq!(plan.candidates, vec![NodeId(7), NodeId(6)]);
        assert_eq!(plan.terminal, NotFoundReason::ExhaustedBoundary);
    }
}
