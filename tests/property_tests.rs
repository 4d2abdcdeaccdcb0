//! Property-based tests for the resolution walk using proptest.
//!
//! Trees are random chains: node `i` hangs off node `i - 1`, each edge is a
//! shadow boundary or not, and each node may or may not provide. Chains are
//! enough because a walk only ever follows one ancestor path.

use std::cell::RefCell;

use proptest::prelude::*;

use shadowscope::resolution::ResolutionWalker;
use shadowscope::{
    ComponentTree, Depth, NodeId, NotFoundReason, ResolutionResult, VisibilityPolicy,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Chain {
    /// `boundary[i]` describes the edge from node `i` to node `i - 1`.
    /// `boundary[0]` is unused.
    boundary: Vec<bool>,
    provides: Vec<bool>,
    start: usize,
}

fn arb_chain() -> impl Strategy<Value = Chain> {
    (1usize..12).prop_flat_map(|len| {
        (
            prop::collection::vec(any::<bool>(), len),
            prop::collection::vec(any::<bool>(), len),
            0..len,
        )
            .prop_map(|(boundary, provides, start)| Chain {
                boundary,
                provides,
                start,
            })
    })
}

fn arb_policy() -> impl Strategy<Value = VisibilityPolicy> {
    prop_oneof![
        Just(VisibilityPolicy::SELF),
        Just(VisibilityPolicy::PARENT),
        Just(VisibilityPolicy::ANCESTOR),
        Just(VisibilityPolicy::UNBOUNDED),
        (0u32..6, any::<bool>()).prop_map(|(d, cross)| VisibilityPolicy::bounded(d, cross)),
    ]
}

fn build(chain: &Chain) -> (ComponentTree, Vec<NodeId>) {
    let mut tree = ComponentTree::new();
    let mut ids = vec![tree.add_root().unwrap()];
    for i in 1..chain.boundary.len() {
        let id = tree.add_child(ids[i - 1], chain.boundary[i]).unwrap();
        ids.push(id);
    }
    (tree, ids)
}

/// Run a walk with a recording probe that succeeds where `provides` says so.
fn walk(
    chain: &Chain,
    policy: VisibilityPolicy,
) -> (ResolutionResult<usize>, Vec<usize>, Vec<NodeId>) {
    let (tree, ids) = build(chain);
    let calls = RefCell::new(Vec::new());
    let probe = |node: NodeId, _: &()| {
        let i = ids.iter().position(|&id| id == node).unwrap();
        calls.borrow_mut().push(i);
        chain.provides[i].then_some(i)
    };
    let result = ResolutionWalker::new(&tree, policy)
        .resolve(ids[chain.start], &(), &probe)
        .unwrap();
    let calls = calls.into_inner();
    (result, calls, ids)
}

/// Independent index-based model of the walk.
fn model(chain: &Chain, policy: VisibilityPolicy) -> Result<usize, NotFoundReason> {
    let mut cur = chain.start;
    if policy.includes_self() {
        return if chain.provides[cur] {
            Ok(cur)
        } else {
            Err(NotFoundReason::ExhaustedDepth)
        };
    }
    let mut steps = 0u32;
    loop {
        if let Depth::Limited(max) = policy.depth() {
            if steps == max {
                return Err(NotFoundReason::ExhaustedDepth);
            }
        }
        if cur == 0 {
            return Err(NotFoundReason::ReachedRoot);
        }
        if chain.boundary[cur] && !policy.cross_boundaries() {
            return Err(NotFoundReason::ExhaustedBoundary);
        }
        cur -= 1;
        steps += 1;
        if chain.provides[cur] {
            return Ok(cur);
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn walk_agrees_with_model(chain in arb_chain(), policy in arb_policy()) {
        let (result, _, ids) = walk(&chain, policy);
        let expected = match model(&chain, policy) {
            Ok(i) => ResolutionResult::Found { node: ids[i], value: i },
            Err(reason) => ResolutionResult::NotFound(reason),
        };
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn self_probes_exactly_the_start(chain in arb_chain()) {
        let (result, calls, ids) = walk(&chain, VisibilityPolicy::SELF);
        prop_assert_eq!(calls, vec![chain.start]);
        if chain.provides[chain.start] {
            prop_assert_eq!(result.node(), Some(ids[chain.start]));
        } else {
            prop_assert_eq!(result.reason(), Some(NotFoundReason::ExhaustedDepth));
        }
    }

    #[test]
    fn parent_probes_at_most_the_parent(chain in arb_chain()) {
        let (result, calls, _) = walk(&chain, VisibilityPolicy::PARENT);
        prop_assert!(calls.len() <= 1);
        if chain.start == 0 {
            prop_assert!(calls.is_empty());
            prop_assert_eq!(result.reason(), Some(NotFoundReason::ReachedRoot));
        } else if chain.boundary[chain.start] {
            prop_assert!(calls.is_empty());
            prop_assert_eq!(result.reason(), Some(NotFoundReason::ExhaustedBoundary));
        } else {
            prop_assert_eq!(calls, vec![chain.start - 1]);
            prop_assert_ne!(result.reason(), Some(NotFoundReason::ExhaustedBoundary));
        }
    }

    #[test]
    fn start_is_never_probed_without_self(chain in arb_chain(), policy in arb_policy()) {
        prop_assume!(!policy.includes_self());
        let (_, calls, _) = walk(&chain, policy);
        prop_assert!(!calls.contains(&chain.start));
    }

    #[test]
    fn ancestor_stays_in_scope(chain in arb_chain()) {
        let (result, calls, ids) = walk(&chain, VisibilityPolicy::ANCESTOR);
        // Every probed node is reached without crossing a boundary edge.
        for &i in &calls {
            prop_assert!((i + 1..=chain.start).all(|j| !chain.boundary[j]));
        }
        if let Some(node) = result.node() {
            let i = ids.iter().position(|&id| id == node).unwrap();
            prop_assert!((i + 1..=chain.start).all(|j| !chain.boundary[j]));
        }
        prop_assert_ne!(result.reason(), Some(NotFoundReason::ExhaustedDepth));
        let blocked = (1..=chain.start).any(|j| chain.boundary[j]);
        if result.reason() == Some(NotFoundReason::ReachedRoot) {
            prop_assert!(!blocked);
        }
    }

    #[test]
    fn unbounded_only_fails_at_root(chain in arb_chain()) {
        let (result, calls, ids) = walk(&chain, VisibilityPolicy::UNBOUNDED);
        match result {
            ResolutionResult::Found { node, value } => {
                prop_assert_eq!(node, ids[value]);
                prop_assert!(chain.provides[value]);
                prop_assert!((value + 1..chain.start).all(|j| !chain.provides[j]));
            }
            ResolutionResult::NotFound(reason) => {
                prop_assert_eq!(reason, NotFoundReason::ReachedRoot);
                prop_assert_eq!(calls, (0..chain.start).rev().collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn walks_are_idempotent(chain in arb_chain(), policy in arb_policy()) {
        let first = walk(&chain, policy);
        let second = walk(&chain, policy);
        prop_assert_eq!(first.0, second.0);
        prop_assert_eq!(first.1, second.1);
    }

    #[test]
    fn probes_never_exceed_depth(chain in arb_chain(), policy in arb_policy()) {
        let (_, calls, _) = walk(&chain, policy);
        let limit = match policy.depth() {
            Depth::Limited(0) => 1,
            Depth::Limited(n) => n as usize,
            Depth::Unbounded => chain.start,
        };
        prop_assert!(calls.len() <= limit);
        // Each node is probed at most once.
        let mut sorted = calls.clone();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), calls.len());
    }

    #[test]
    fn probes_are_a_prefix_of_plan(chain in arb_chain(), policy in arb_policy()) {
        let (tree, ids) = build(&chain);
        let plan = ResolutionWalker::new(&tree, policy).plan(ids[chain.start]).unwrap();
        let (_, calls, _) = walk(&chain, policy);
        let planned: Vec<usize> = plan
            .candidates
            .iter()
            .map(|n| ids.iter().position(|id| id == n).unwrap())
            .collect();
        prop_assert!(planned.starts_with(&calls));
        let all_miss = Chain { provides: vec![false; chain.provides.len()], ..chain.clone() };
        prop_assert_eq!(
            model(&all_miss, policy),
            Err(plan.terminal)
        );
    }
}
