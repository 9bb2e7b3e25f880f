/// rumord: one rumorkv cluster node.
///
/// Usage:
///   rumord <node-id>
///
/// The id indexes the compiled-in cluster table; the process binds that
/// entry's address, serves the HTTP surface, and gossips its operation
/// log to the other members until interrupted.
use anyhow::{Context, Result};
use clap::Parser;
use rumorkv::{ClusterConfig, Node, NodeId};
use std::sync::Arc;
use tokio::signal;

#[derive(Parser)]
#[command(name = "rumord", about = "Replicated key-value store node")]
struct Cli {
    /// Index of this node in the compiled-in cluster table.
    node_id: NodeId,
}

#[tokio::main]
async fn main() -> Result<()> {
    rumorkv::init_logging();
    let cli = Cli::parse();

    let config = Arc::new(ClusterConfig::default());
    let node = Node::new(config, cli.node_id).context("invalid node id")?;
    node.start().await.context("node startup failed")?;

    signal::ctrl_c().await.ok();
    node.stop();
    Ok(())
}
