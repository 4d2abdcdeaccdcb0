//! The probe seam between the resolution walker and per-node injectors.
//!
//! The walker never looks inside an injector. It asks one question per
//! candidate node: "can you satisfy this request?" through [`Probe`].
//! Closures work as probes directly; [`ComponentTree`] probes the
//! [`LocalInjector`] owned by each node.
//!
//! [`ComponentTree`]: crate::tree::ComponentTree

mod local;

pub use local::LocalInjector;

use crate::tree::{ComponentTree, NodeId};

/// A node-local attempt to satisfy a dependency request.
///
/// Within one resolution a probe is asked about each node at most once.
pub trait Probe<R: ?Sized> {
    type Value;

    fn probe(&self, node: NodeId, request: &R) -> Option<Self::Value>;
}

impl<R, V, F> Probe<R> for F
where
    R: ?Sized,
    F: Fn(NodeId, &R) -> Option<V>,
{
    type Value = V;

    fn probe(&self, node: NodeId, request: &R) -> Option<V> {
        self(node, request)
    }
}

impl Probe<str> for ComponentTree {
    type Value = serde_json::Value;

    fn probe(&self, node: NodeId, token: &str) -> Option<serde_json::Value> {
        self.injector(node)
            .and_then(|injector| injector.get(token))
            .cloned()
    }
}

impl Probe<String> for ComponentTree {
    type Value = serde_json::Value;

    fn probe(&self, node: NodeId, token: &String) -> Option<serde_json::Value> {
        Probe::<str>::probe(self, node, token.as_str())
    }
}
