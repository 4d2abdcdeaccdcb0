//! Command-line interface definitions.
//!
//! `main.rs` parses [`Cli`] and hands it to [`commands::run`].

pub mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::Result;
use crate::policy::VisibilityPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "shadowscope",
    version,
    about = "Resolve dependencies across a component tree under visibility policies"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find the node that provides a token for a request.
    Resolve(ResolveArgs),
    /// Show which nodes a walk would probe and where it would stop.
    Explain(ExplainArgs),
    /// Validate a tree file and print its shape.
    Check(TreeArgs),
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Tree fixture (YAML). Defaults to shadowscope.yaml in the config dir.
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PolicyArgs {
    /// Named policy: self, parent, ancestor, unbounded.
    #[arg(long, conflicts_with = "depth")]
    pub policy: Option<VisibilityPolicy>,

    /// Custom policy depth (number of parent edges).
    #[arg(long, allow_negative_numbers = true)]
    pub depth: Option<i64>,

    /// Let a custom policy cross shadow boundaries.
    #[arg(long, requires = "depth")]
    pub cross_boundaries: bool,
}

impl PolicyArgs {
    /// The requested policy, or `default` when none was given.
    pub fn select(&self, default: VisibilityPolicy) -> Result<VisibilityPolicy> {
        match (self.policy, self.depth) {
            (Some(policy), _) => Ok(policy),
            (None, Some(depth)) => VisibilityPolicy::new(depth, self.cross_boundaries),
            (None, None) => Ok(default),
        }
    }
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Name of the requesting node.
    #[arg(long)]
    pub from: String,

    /// Token to resolve.
    #[arg(long)]
    pub token: String,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Name of the requesting node.
    #[arg(long)]
    pub from: String,
}
