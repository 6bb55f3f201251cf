//! Wide-and-deep training and evaluation binary.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use widedeep_cli::{run, Cli, RunConfig};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = RunConfig::from(cli);

    info!("Wide-and-deep run starting...");
    run(&config)?;
    info!("Run completed successfully");
    Ok(())
}
