//! Configuration: tree fixture schema and loading.
//!
//! Trees are read from YAML. When no path is given, the CLI falls back to
//! `shadowscope.yaml` in the platform config directory.

pub mod schema;

pub use schema::{NamedTree, NodeConfig, TreeConfig};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, ShadowScopeError};

/// File name looked up in the platform config directory.
pub const DEFAULT_CONFIG_FILE: &str = "shadowscope.yaml";

/// Parse a tree fixture from YAML text.
pub fn parse_tree_config(yaml: &str) -> Result<TreeConfig> {
    let config: TreeConfig = serde_yaml::from_str(yaml)?;
    if config.version != "1.0" {
        return Err(ShadowScopeError::Config(format!(
            "unsupported config version {:?}",
            config.version
        )));
    }
    Ok(config)
}

/// Read and parse a tree fixture file.
pub fn load_tree_config(path: &Path) -> Result<TreeConfig> {
    debug!(path = %path.display(), "loading tree config");
    let text = std::fs::read_to_string(path)?;
    let config = parse_tree_config(&text)?;
    info!(path = %path.display(), nodes = config.nodes.len(), "loaded tree config");
    Ok(config)
}

/// `<config dir>/shadowscope/shadowscope.yaml`, if the platform has a
/// config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "shadowscope")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_FILE))
}

/// Resolve an explicit path or fall back to [`default_config_path`].
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    default_config_path().ok_or_else(|| {
        ShadowScopeError::Config(
            "no --tree given and no platform config directory available".to_string(),
        )
    })
}
