use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node's own provider table: token → provided value.
///
/// Stands in for the DI container's bindings; the walker only ever sees it
/// through [`Probe`](super::Probe).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalInjector {
    providers: BTreeMap<String, Value>,
}

impl LocalInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, token: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(token, value);
        self
    }

    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.providers.insert(token.into(), value.into())
    }

    pub fn get(&self, token: &str) -> Option<&Value> {
        self.providers.get(token)
    }

    pub fn provides(&self, token: &str) -> bool {
        self.providers.contains_key(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
