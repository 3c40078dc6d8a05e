//! Mandala CLI - Harada-method goal trees.

mod snapshot;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mandala_core::{Expansion, NodeId};
use mandala_progress::ProgressTracker;
use mandala_tree::{check_invariants, expand_node, TreeArena};
use snapshot::{load_shape, Snapshot};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mandala")]
#[command(about = "Harada-method goal trees", long_about = None)]
struct Cli {
    /// Tree shape JSON (fanout, levels); defaults to the 8-way mandala
    #[arg(long, global = true)]
    shape: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new tree
    New {
        /// Root goal title
        title: String,
        /// Levels to generate up front
        #[arg(long)]
        depth: Option<u8>,
        /// Output snapshot file
        #[arg(long, default_value = "mandala.json")]
        out: PathBuf,
    },
    /// Generate the children of a node if it has none yet
    Expand {
        /// Snapshot file
        file: PathBuf,
        /// Node ID
        id: String,
    },
    /// Show progress of every node
    Progress {
        /// Snapshot file
        file: PathBuf,
    },
    /// Check structural invariants
    Check {
        /// Snapshot file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cli_shape = load_shape(cli.shape.as_deref()).await?;

    match cli.command {
        Commands::New { title, depth, out } => {
            let depth = depth.unwrap_or(cli_shape.initial_depth);
            let (root_id, arena) = TreeArena::create(title, depth, &cli_shape)?;
            let snapshot = Snapshot {
                shape: Some(cli_shape),
                nodes: arena.into_nodes(),
                checklists: Vec::new(),
            };
            snapshot.save(&out).await?;
            println!("Created tree {} ({} nodes) in {}", root_id, snapshot.nodes.len(), out.display());
        }
        Commands::Expand { file, id } => {
            let node_id: NodeId = id.parse().map_err(|_| anyhow::anyhow!("Invalid node ID"))?;
            let mut snapshot = Snapshot::load(&file).await?;
            let shape = snapshot.shape_or(cli_shape)?;

            let mut arena = TreeArena::from_nodes(std::mem::take(&mut snapshot.nodes));
            let before = arena.len();
            let children = expand_node(&mut arena, node_id, &shape)?;
            let added = arena.len() - before;
            snapshot.nodes = arena.into_nodes();

            if added > 0 {
                snapshot.save(&file).await?;
                info!("Saved {} new nodes to {}", added, file.display());
            }
            println!("{} children ({} new)", children.len(), added);
            for child in children {
                println!("  {} | {} | {}", child.id, child.index_in_parent, child.title);
            }
        }
        Commands::Progress { file } => {
            let snapshot = Snapshot::load(&file).await?;
            let shape = snapshot.shape_or(cli_shape)?;
            let checklists = snapshot.checklists_by_node();

            let tracker = ProgressTracker::new(shape);
            let result = tracker.evaluate(&snapshot.nodes, Some(&checklists));
            println!("Progress as of {}", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
            for entry in tracker.annotate_from(&snapshot.nodes, &result) {
                let indent = "  ".repeat(entry.node.level.saturating_sub(1) as usize);
                println!(
                    "{}{:>5.1}% {} [{}]{}{}",
                    indent,
                    entry.progress * 100.0,
                    entry.node.title,
                    entry.node.status.as_str(),
                    if entry.inherited_blocked { " (locked)" } else { "" },
                    format_expansion(entry.expansion),
                );
            }
        }
        Commands::Check { file } => {
            let snapshot = Snapshot::load(&file).await?;
            let shape = snapshot.shape_or(cli_shape)?;

            match check_invariants(&snapshot.nodes, &shape) {
                Ok(()) => println!("OK: {} nodes", snapshot.nodes.len()),
                Err(violations) => {
                    for violation in &violations {
                        println!("  {}", violation);
                    }
                    anyhow::bail!("{} invariant violations", violations.len());
                }
            }
        }
    }

    Ok(())
}

fn format_expansion(expansion: Expansion) -> &'static str {
    match expansion {
        Expansion::Pending => " +",
        Expansion::Expanded | Expansion::Terminal => "",
    }
}
