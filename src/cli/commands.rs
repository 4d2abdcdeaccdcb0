//! Command handlers for the `shadowscope` binary.
//!
//! Each handler loads the tree, does its work, and renders output as text
//! or JSON. Rendering is split out so it can be tested without a terminal.

use std::process::ExitCode;

use console::style;
use serde_json::json;
use tracing::{info, warn};

use super::{Cli, Command, ExplainArgs, ResolveArgs, TreeArgs};
use crate::config::{self, NamedTree};
use crate::error::Result;
use crate::observability;
use crate::policy::VisibilityPolicy;
use crate::resolution::{ResolutionWalker, TracedResolution, WalkPlan};
use crate::tree::{NodeId, TreeView};

/// Entry point used by `main`.
pub fn run(cli: Cli) -> Result<ExitCode> {
    observability::init_logging(cli.verbose);
    match cli.command {
        Command::Resolve(args) => cmd_resolve(&args),
        Command::Explain(args) => cmd_explain(&args),
        Command::Check(args) => cmd_check(&args),
    }
}

fn load(args: &TreeArgs) -> Result<NamedTree> {
    let path = config::resolve_config_path(args.tree.as_deref())?;
    config::load_tree_config(&path)?.build()
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Resolve a token; exits with failure when nothing provides it.
pub fn cmd_resolve(args: &ResolveArgs) -> Result<ExitCode> {
    let named = load(&args.tree)?;
    let policy = args.policy.select(named.default_policy)?;
    let from = named.id(&args.from)?;

    let traced = ResolutionWalker::new(&named.tree, policy).resolve_with_trace(
        from,
        args.token.as_str(),
        &named.tree,
    )?;

    let found = traced.result.is_found();
    if found {
        info!(token = %args.token, from = %args.from, "resolved");
    } else {
        warn!(token = %args.token, from = %args.from, "no provider in scope");
    }

    let out = if args.tree.json {
        serde_json::to_string_pretty(&resolve_json(&named, &args.token, policy, &traced))?
    } else {
        render_resolve(&named, &args.token, policy, &traced)
    };
    println!("{}", out);

    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn render_resolve(
    named: &NamedTree,
    token: &str,
    policy: VisibilityPolicy,
    traced: &TracedResolution<serde_json::Value>,
) -> String {
    let mut out = String::new();
    match traced.result.node() {
        Some(node) => {
            out.push_str(&format!(
                "{} {} provided by {} ({})\n",
                style("✓").green().bold(),
                style(token).bold(),
                style(named.label(node)).cyan(),
                policy
            ));
            if let Some(value) = traced.result.value() {
                out.push_str(&format!("  value: {}\n", value));
            }
        }
        None => {
            let reason = traced.result.reason().map(|r| r.to_string()).unwrap_or_default();
            out.push_str(&format!(
                "{} no provider for {} ({}): {}\n",
                style("✗").red().bold(),
                style(token).bold(),
                policy,
                reason
            ));
        }
    }
    out.push_str(&format!("  probed: {}", labels(named, &traced.probed)));
    out
}

fn resolve_json(
    named: &NamedTree,
    token: &str,
    policy: VisibilityPolicy,
    traced: &TracedResolution<serde_json::Value>,
) -> serde_json::Value {
    json!({
        "token": token,
        "policy": policy,
        "found": traced.result.is_found(),
        "node": traced.result.node().map(|n| named.label(n)),
        "value": traced.result.value(),
        "reason": traced.result.reason(),
        "probed": traced.probed.iter().map(|&n| named.label(n)).collect::<Vec<_>>(),
    })
}

// ---------------------------------------------------------------------------
// explain
// ---------------------------------------------------------------------------

pub fn cmd_explain(args: &ExplainArgs) -> Result<ExitCode> {
    let named = load(&args.tree)?;
    let policy = args.policy.select(named.default_policy)?;
    let from = named.id(&args.from)?;
    let plan = ResolutionWalker::new(&named.tree, policy).plan(from)?;

    let out = if args.tree.json {
        serde_json::to_string_pretty(&json!({
            "from": args.from,
            "policy": plan.policy,
            "candidates": plan.candidates.iter().map(|&n| named.label(n)).collect::<Vec<_>>(),
            "terminal": plan.terminal,
        }))?
    } else {
        render_plan(&named, &plan)
    };
    println!("{}", out);
    Ok(ExitCode::SUCCESS)
}

pub fn render_plan(named: &NamedTree, plan: &WalkPlan) -> String {
    let mut out = format!(
        "walk from {} under {}\n",
        style(named.label(plan.start)).cyan(),
        style(plan.policy).bold()
    );
    if plan.candidates.is_empty() {
        out.push_str("  (no candidates)\n");
    }
    for (i, node) in plan.candidates.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, named.label(*node)));
    }
    out.push_str(&format!("  stops: {}", style(plan.terminal).yellow()));
    out
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

pub fn cmd_check(args: &TreeArgs) -> Result<ExitCode> {
    let named = load(args)?;
    let out = if args.json {
        serde_json::to_string_pretty(&check_json(&named))?
    } else {
        render_tree(&named)
    };
    println!("{}", out);
    Ok(ExitCode::SUCCESS)
}

fn check_json(named: &NamedTree) -> serde_json::Value {
    json!({
        "nodes": named.tree.len(),
        "boundaries": boundary_count(named),
        "root": named.tree.root().map(|n| named.label(n)),
        "names": named.names().map(|(name, _)| name).collect::<Vec<_>>(),
        "default_policy": named.default_policy,
    })
}

fn boundary_count(named: &NamedTree) -> usize {
    named
        .tree
        .node_ids()
        .filter_map(|id| named.tree.edge_to_parent(id))
        .filter(|edge| edge.is_boundary_crossing())
        .count()
}

/// Indented outline of the tree. Boundary edges are drawn with `╞═`.
pub fn render_tree(named: &NamedTree) -> String {
    let mut out = format!(
        "{} {} nodes, {} shadow boundaries, default policy {}\n",
        style("tree ok:").green().bold(),
        named.tree.len(),
        boundary_count(named),
        named.default_policy
    );
    if let Some(root) = named.tree.root() {
        let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
        while let Some((node, level)) = stack.pop() {
            let connector = match named.tree.edge_to_parent(node) {
                None => "",
                Some(edge) if edge.is_boundary_crossing() => "╞═ ",
                Some(_) => "├─ ",
            };
            let tokens: Vec<&str> = named
                .tree
                .injector(node)
                .map(|inj| inj.tokens().collect())
                .unwrap_or_default();
            out.push_str(&format!(
                "{}{}{}",
                "   ".repeat(level),
                connector,
                named.label(node)
            ));
            if !tokens.is_empty() {
                out.push_str(&format!(" [{}]", tokens.join(", ")));
            }
            out.push('\n');
            for &child in named.tree.children(node).iter().rev() {
                stack.push((child, level + 1));
            }
        }
    }
    out.trim_end().to_string()
}

fn labels(named: &NamedTree, nodes: &[NodeId]) -> String {
    if nodes.is_empty() {
        return "(none)".to_string();
    }
    nodes
        .iter()
        .map(|&n| named.label(n))
        .collect::<Vec<_>>()
        .join(" → ")
}
