//! aliastree - lowest common ancestor queries over hierarchies with aliases.
//!
//! Usage:
//!   aliastree demo                      Run the built-in sample queries
//!   aliastree tree MANIFEST             Render a hierarchy
//!   aliastree path MANIFEST NODE        Show the structural path to a node
//!   aliastree lca MANIFEST A B          Find the common ancestor of two nodes
//!   aliastree aliases MANIFEST          Report where aliases point
//!
//! Nodes are addressed by slash-separated names from the root. A trailing
//! `@` dereferences an alias: `folder1/aliasToFolder2@` is folder2. A node
//! whose own name ends in `@` is matched by name before any dereference.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use itertools::Itertools;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use aliastree_core::{Hierarchy, NodeId, NodeManifest, ResolverConfig, TraversalStrategy};
use aliastree_resolve::{AliasAnalyzer, AliasReport, AncestorResolver};

#[derive(Parser)]
#[command(
    name = "aliastree",
    version,
    about = "Lowest common ancestor queries over hierarchies with alias nodes",
    long_about = "aliastree finds common ancestors in trees that contain alias nodes.\n\n\
                  Ancestry always follows the real parent-child structure. An alias \
                  is located where it sits, not where it points; append `@` to a node \
                  path to ask about the alias target instead."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the sample hierarchy and run the reference queries
    Demo {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Render a hierarchy manifest as a tree
    Tree {
        /// JSON manifest describing the hierarchy
        manifest: PathBuf,
    },

    /// Show the structural path from the root to a node
    Path {
        /// JSON manifest describing the hierarchy
        manifest: PathBuf,

        /// Node path, e.g. "folder1/file1"
        node: String,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// Find the lowest common ancestor of two nodes
    Lca {
        /// JSON manifest describing the hierarchy
        manifest: PathBuf,

        /// First node path
        a: String,

        /// Second node path
        b: String,

        #[command(flatten)]
        resolver: ResolverArgs,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Report every alias and where it points
    Aliases {
        /// JSON manifest describing the hierarchy
        manifest: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct ResolverArgs {
    /// Path search strategy (iterative, recursive)
    #[arg(long, default_value = "iterative")]
    strategy: TraversalStrategy,

    /// Only search this many levels below the root
    #[arg(long)]
    max_depth: Option<u32>,
}

impl ResolverArgs {
    fn resolver(&self) -> Result<AncestorResolver> {
        let config = ResolverConfig::builder()
            .strategy(self.strategy)
            .max_depth(self.max_depth)
            .build()
            .wrap_err("Invalid resolver options")?;
        Ok(AncestorResolver::with_config(config))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// A node as shown in JSON output.
#[derive(Debug, Serialize)]
struct NodeInfo {
    id: NodeId,
    name: String,
    path: Option<String>,
}

/// One answered query.
#[derive(Debug, Serialize)]
struct LcaAnswer {
    a: String,
    b: String,
    ancestor: Option<NodeInfo>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Demo { format } => run_demo(format)?,
        Command::Tree { manifest } => run_tree(&manifest)?,
        Command::Path {
            manifest,
            node,
            resolver,
        } => run_path(&manifest, &node, &resolver.resolver()?)?,
        Command::Lca {
            manifest,
            a,
            b,
            resolver,
            format,
        } => run_lca(&manifest, &a, &b, &resolver.resolver()?, format)?,
        Command::Aliases { manifest, format } => run_aliases(&manifest, format)?,
    }

    Ok(())
}

/// Install a stderr subscriber. `RUST_LOG` overrides the `-v` count.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load a manifest and build its hierarchy.
fn load(manifest: &Path) -> Result<(Hierarchy, NodeId)> {
    let manifest = NodeManifest::from_path(manifest).context("Failed to load manifest")?;
    let loaded = Hierarchy::from_manifest(&manifest).context("Failed to build hierarchy")?;
    tracing::info!(nodes = loaded.0.len(), "hierarchy loaded");
    Ok(loaded)
}

/// Resolve a node argument. Each trailing `@` follows one alias edge.
///
/// Names that themselves end in `@` win: the longest prefix of `spec`
/// naming a node is selected and only the `@`s after it dereference.
fn select_node(hierarchy: &Hierarchy, root: NodeId, spec: &str) -> Result<NodeId> {
    let bare = spec.trim_end_matches('@');
    let (mut id, derefs) = (0..=spec.len() - bare.len())
        .find_map(|derefs| {
            let path = &spec[..spec.len() - derefs];
            hierarchy.lookup(root, path).map(|id| (id, derefs))
        })
        .ok_or_else(|| eyre!("No node at '{bare}'"))?;

    for _ in 0..derefs {
        id = match hierarchy.alias_target(id) {
            Some(target) => target,
            None => bail!(
                "'{}' is not an alias and cannot be dereferenced",
                hierarchy.name(id).unwrap_or_default()
            ),
        };
    }
    Ok(id)
}

fn node_info(
    hierarchy: &Hierarchy,
    root: NodeId,
    id: NodeId,
    resolver: &AncestorResolver,
) -> NodeInfo {
    NodeInfo {
        id,
        name: hierarchy.name(id).unwrap_or_default().to_string(),
        path: resolver
            .find_path(hierarchy, root, id)
            .map(|p| p.display(hierarchy)),
    }
}

/// Build the reference hierarchy through the public API.
fn build_sample() -> Result<(Hierarchy, NodeId)> {
    let mut h = Hierarchy::new();
    let root = h.create_node("root");
    let folder1 = h.create_node("folder1");
    let folder2 = h.create_node("folder2");
    let file1 = h.create_node("file1");
    let file2 = h.create_node("file2");
    let folder3 = h.create_node("folder3");
    let deep_folder = h.create_node("deepFolder");
    let deep_file1 = h.create_node("deepFile1");
    let deep_file2 = h.create_node("deepFile2");

    h.add_child(root, folder1)?;
    h.add_child(root, folder2)?;
    h.add_child(root, folder3)?;

    h.add_child(folder1, file1)?;
    h.add_child(folder2, file2)?;
    h.add_child(folder3, deep_folder)?;
    h.add_child(deep_folder, deep_file1)?;
    h.add_child(deep_folder, deep_file2)?;

    h.add_alias(folder1, "aliasToFolder2", folder2)?;
    h.add_alias(folder2, "aliasToFolder3", folder3)?;
    h.add_alias(folder1, "aliasToDeepFile1", deep_file1)?;

    Ok((h, root))
}

/// Reference queries over the sample hierarchy.
const DEMO_QUERIES: &[(&str, &str)] = &[
    ("folder1/file1", "folder2"),
    ("folder2", "folder2/file2"),
    ("folder1/file1", "folder3/deepFolder/deepFile1"),
    ("folder2/file2", "folder3"),
    ("folder2", "folder3"),
    ("folder3/deepFolder/deepFile1", "folder3/deepFolder/deepFile2"),
    ("folder1/aliasToFolder2", "folder2"),
    ("folder1/aliasToFolder2@", "folder2"),
    ("folder1/aliasToFolder2", "folder1/file1"),
    ("folder1/file1", "folder1/aliasToDeepFile1@"),
    ("folder1/aliasToFolder2@", "folder2/file2"),
    ("folder2/file2", "folder2/aliasToFolder3@"),
    ("folder1/aliasToFolder2@", "folder2/aliasToFolder3@"),
];

fn answer(
    hierarchy: &Hierarchy,
    root: NodeId,
    resolver: &AncestorResolver,
    a: &str,
    b: &str,
) -> Result<LcaAnswer> {
    let node_a = select_node(hierarchy, root, a)?;
    let node_b = select_node(hierarchy, root, b)?;
    let ancestor = resolver
        .find_common_ancestor(hierarchy, root, node_a, node_b)
        .map(|id| node_info(hierarchy, root, id, resolver));
    Ok(LcaAnswer {
        a: a.to_string(),
        b: b.to_string(),
        ancestor,
    })
}

/// Run the built-in sample.
fn run_demo(format: OutputFormat) -> Result<()> {
    let (hierarchy, root) = build_sample()?;
    let resolver = AncestorResolver::new();

    let answers = DEMO_QUERIES
        .iter()
        .map(|(a, b)| answer(&hierarchy, root, &resolver, a, b))
        .collect::<Result<Vec<_>>>()?;

    match format {
        OutputFormat::Text => {
            print_tree(&hierarchy, root, &resolver);
            println!();
            println!("{}", "─".repeat(70));
            println!(" Common ancestors");
            println!("{}", "─".repeat(70));
            for answer in &answers {
                println!(
                    " {:<32} {:<32} {}",
                    answer.a,
                    answer.b,
                    answer.ancestor.as_ref().map_or("none", |n| n.name.as_str())
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&answers)?);
        }
    }

    Ok(())
}

/// Render a manifest's hierarchy.
fn run_tree(manifest: &Path) -> Result<()> {
    let (hierarchy, root) = load(manifest)?;
    let stats = hierarchy.stats(root);

    print_tree(&hierarchy, root, &AncestorResolver::new());
    println!();
    println!(
        " {} nodes, {} aliases, {} leaves, depth {}",
        stats.total_nodes, stats.total_aliases, stats.total_leaves, stats.max_depth
    );

    Ok(())
}

/// Print the structural path to a node.
fn run_path(manifest: &Path, node: &str, resolver: &AncestorResolver) -> Result<()> {
    let (hierarchy, root) = load(manifest)?;
    let id = select_node(&hierarchy, root, node)?;

    match resolver.find_path(&hierarchy, root, id) {
        Some(path) => println!("{}", path.display(&hierarchy)),
        None => bail!(
            "'{}' is not structurally reachable from the root",
            hierarchy.name(id).unwrap_or_default()
        ),
    }

    Ok(())
}

/// Answer a single common ancestor query.
fn run_lca(
    manifest: &Path,
    a: &str,
    b: &str,
    resolver: &AncestorResolver,
    format: OutputFormat,
) -> Result<()> {
    let (hierarchy, root) = load(manifest)?;
    let result = answer(&hierarchy, root, resolver, a, b)?;

    match format {
        OutputFormat::Text => {
            for spec in [a, b] {
                let id = select_node(&hierarchy, root, spec)?;
                let info = node_info(&hierarchy, root, id, resolver);
                println!(
                    " {spec}: {}",
                    info.path.as_deref().unwrap_or("(unreachable)")
                );
            }
            match result.ancestor {
                Some(info) => println!(
                    " common ancestor: {} ({})",
                    info.name,
                    info.path.unwrap_or_default()
                ),
                None => println!(" no common ancestor"),
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

/// Report every alias under the root.
fn run_aliases(manifest: &Path, format: OutputFormat) -> Result<()> {
    let (hierarchy, root) = load(manifest)?;
    let report = AliasAnalyzer::new().analyze(&hierarchy, root);

    match format {
        OutputFormat::Text => print_alias_report(&hierarchy, &report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn print_alias_report(hierarchy: &Hierarchy, report: &AliasReport) {
    let name = |id: NodeId| hierarchy.name(id).unwrap_or("?").to_string();

    if !report.has_aliases() {
        println!(" No aliases found.");
        return;
    }

    println!(
        " {} aliases ({} cyclic, {} dangling)",
        report.aliases.len(),
        report.cyclic_count,
        report.dangling_count
    );
    for entry in &report.aliases {
        let mut flags = Vec::new();
        if entry.cyclic {
            flags.push("cycle");
        }
        if !entry.target_reachable {
            flags.push("dangling");
        }
        println!(
            "   {} -> {}  meet at {}{}",
            entry.name,
            name(entry.target),
            entry.common_ancestor.map_or("none".to_string(), name),
            if flags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", flags.iter().join(", "))
            }
        );
    }
}

fn print_tree(hierarchy: &Hierarchy, root: NodeId, resolver: &AncestorResolver) {
    println!("{}", hierarchy.name(root).unwrap_or_default());
    print_children(hierarchy, root, root, resolver, "");
}

/// Print the children of a node with box-drawing branches.
fn print_children(
    hierarchy: &Hierarchy,
    root: NodeId,
    id: NodeId,
    resolver: &AncestorResolver,
    prefix: &str,
) {
    let children = hierarchy.children(id);
    for (i, &child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        println!(
            "{prefix}{branch}{}",
            describe(hierarchy, root, child, resolver)
        );
        let next = format!("{prefix}{}", if last { "    " } else { "│   " });
        print_children(hierarchy, root, child, resolver, &next);
    }
}

/// Node label, with the alias target's path for aliases.
fn describe(hierarchy: &Hierarchy, root: NodeId, id: NodeId, resolver: &AncestorResolver) -> String {
    let name = hierarchy.name(id).unwrap_or_default();
    match hierarchy.alias_target(id) {
        Some(target) => {
            let shown = resolver
                .find_path(hierarchy, root, target)
                .map(|p| p.iter().skip(1).map(|&n| hierarchy.name(n).unwrap_or("?")).join("/"))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| hierarchy.name(target).unwrap_or("?").to_string());
            format!("{name} -> {shown}")
        }
        None => name.to_string(),
    }
}
