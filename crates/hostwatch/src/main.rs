mod config;
mod hosts;
mod monitor;
mod packet;
mod probe;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context as _, Result, bail};
use clap::Parser;
use tracing::info;

use crate::{
    config::{HostSource, open_config, write_default_config},
    probe::Prober,
};

#[derive(Parser)]
#[command(version)]
struct Args {
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    if args.init {
        write_default_config(&args.config)?;
        info!(path = ?args.config, "Created default configuration");
        return Ok(());
    }

    let config = open_config(&args.config).context("Failed to load configuration")?;

    let hosts = match config.host_source()? {
        HostSource::File(path) => hosts::read_hosts_from_file(path)?,
        HostSource::Console => hosts::read_hosts_from_console()?,
    };
    if hosts.is_empty() {
        bail!("no hosts to monitor");
    }
    info!(hosts = hosts.len(), "Host list loaded");

    let prober = Prober::new();
    monitor::run(
        &hosts,
        &prober,
        Duration::from_secs(config.sleep_time),
        Duration::from_secs(config.timeout),
    )
    .await;

    Ok(())
}
