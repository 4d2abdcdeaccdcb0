//! Tree fixture format.
//!
//! A YAML document lists the nodes of one component tree in parent-first
//! order. Each node may carry a provider table and may mark the edge to its
//! parent as a shadow boundary.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ShadowScopeError};
use crate::injector::LocalInjector;
use crate::policy::VisibilityPolicy;
use crate::tree::{ComponentTree, NodeId};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root of a tree fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Policy used when a request does not name one.
    #[serde(default = "default_policy")]
    pub default_policy: VisibilityPolicy,

    /// Nodes in parent-first order. The single node without a parent is
    /// the root.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_policy: default_policy(),
            nodes: Vec::new(),
        }
    }
}

/// One component node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Whether the edge to `parent` is a shadow boundary.
    #[serde(default)]
    pub boundary: bool,

    #[serde(default, skip_serializing_if = "LocalInjector::is_empty")]
    pub providers: LocalInjector,
}

impl NodeConfig {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            boundary: false,
            providers: LocalInjector::new(),
        }
    }

    pub fn child(name: impl Into<String>, parent: impl Into<String>, boundary: bool) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
            boundary,
            providers: LocalInjector::new(),
        }
    }

    pub fn with_providers(mut self, providers: LocalInjector) -> Self {
        self.providers = providers;
        self
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_policy() -> VisibilityPolicy {
    VisibilityPolicy::ANCESTOR
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// A tree built from config, with its name index.
#[derive(Debug, Clone)]
pub struct NamedTree {
    pub tree: ComponentTree,
    pub default_policy: VisibilityPolicy,
    ids: BTreeMap<String, NodeId>,
    names: HashMap<NodeId, String>,
}

impl NamedTree {
    pub fn id(&self, name: &str) -> Result<NodeId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| ShadowScopeError::UnknownNodeName(name.to_string()))
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    /// The node's name, or its id when it has none.
    pub fn label(&self, id: NodeId) -> String {
        self.name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn names(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.ids.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

impl TreeConfig {
    /// Build the component tree described by this config.
    pub fn build(&self) -> Result<NamedTree> {
        let mut tree = ComponentTree::new();
        let mut ids: BTreeMap<String, NodeId> = BTreeMap::new();
        let mut names = HashMap::new();

        if self.nodes.is_empty() {
            return Err(ShadowScopeError::Config("tree has no nodes".to_string()));
        }

        for node in &self.nodes {
            if ids.contains_key(&node.name) {
                return Err(ShadowScopeError::DuplicateNodeName(node.name.clone()));
            }

            let id = match &node.parent {
                None => {
                    if node.boundary {
                        return Err(ShadowScopeError::Config(format!(
                            "root node {:?} cannot sit behind a shadow boundary",
                            node.name
                        )));
                    }
                    tree.add_root().map_err(|_| {
                        ShadowScopeError::Config(format!(
                            "node {:?} has no parent but the tree already has a root",
                            node.name
                        ))
                    })?
                }
                Some(parent) => {
                    let parent_id = ids.get(parent).copied().ok_or_else(|| {
                        ShadowScopeError::Config(format!(
                            "node {:?} names parent {:?}, which is not declared before it",
                            node.name, parent
                        ))
                    })?;
                    tree.add_child(parent_id, node.boundary)?
                }
            };

            if !node.providers.is_empty() {
                tree.attach_injector(id, node.providers.clone())?;
            }
            ids.insert(node.name.clone(), id);
            names.insert(id, node.name.clone());
        }

        if tree.root().is_none() {
            return Err(ShadowScopeError::Config("tree has no root node".to_string()));
        }

        debug!(nodes = tree.len(), "built component tree from config");
        Ok(NamedTree {
            tree,
            default_policy: self.default_policy,
            ids,
            names,
        })
    }
}
