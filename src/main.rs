// SPDX-License-Identifier: MIT

//! netwatch-agent: passive network-discovery agent.
//!
//! Observes local multicast/name-resolution/neighbor-table/DHCP signals,
//! normalises them into observation records, and batches them to a
//! remote collector over authenticated HTTP. See SPEC_FULL.md for the
//! full component breakdown.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod arp;
mod config;
mod dhcp;
mod error;
mod heartbeat;
mod listener;
mod observation;
mod parse;
mod queue;
mod registration;
mod sender;
mod signer;
mod status;
mod status_server;
mod supervisor;
mod update;

use config::AgentConfig;

/// netwatch-agent - passive network-discovery agent
#[derive(Parser, Debug)]
#[command(name = "netwatch-agent")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (falls back to NETWATCH_AGENT_CONFIG, then config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = AgentConfig::resolve_path(args.config.as_deref());
    let config = AgentConfig::load(&config_path)?;

    info!(
        api_base = %config.api_base,
        queue_max = config.queue_max,
        batch_size = config.batch_size,
        "netwatch-agent v{} starting",
        status::VERSION,
    );

    supervisor::run(config, config_path).await?;

    info!("netwatch-agent stopped");
    Ok(())
}
