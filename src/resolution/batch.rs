//! Parallel resolution of independent requests over one tree snapshot.
//!
//! Walks never mutate the tree, so a shared `&T` is enough to fan requests
//! out across the rayon pool. Callers keep structural mutation out of the
//! window by holding the tree borrowed for the duration of the batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::result::ResolutionResult;
use super::walker::ResolutionWalker;
use crate::error::Result;
use crate::injector::Probe;
use crate::policy::VisibilityPolicy;
use crate::tree::{NodeId, TreeView};

/// A dependency request arriving at a node under a visibility policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request<R> {
    pub from: NodeId,
    pub policy: VisibilityPolicy,
    pub descriptor: R,
}

impl<R> Request<R> {
    pub fn new(from: NodeId, policy: VisibilityPolicy, descriptor: R) -> Self {
        Self {
            from,
            policy,
            descriptor,
        }
    }
}

/// Resolve every request in parallel. Output order matches input order.
pub fn resolve_batch<T, R, P>(
    tree: &T,
    requests: &[Request<R>],
    probe: &P,
) -> Vec<Result<ResolutionResult<P::Value>>>
where
    T: TreeView + Sync + ?Sized,
    R: Sync,
    P: Probe<R> + Sync + ?Sized,
    P::Value: Send,
{
    requests
        .par_iter()
        .map(|req| ResolutionWalker::new(tree, req.policy).resolve(req.from, &req.descriptor, probe))
        .collect()
}
