//! schemagen command-line entry point.
//!
//! Run with: `schemagen generate ./types --snapshot schema-snapshot.json`
//! Log verbosity is controlled through `RUST_LOG`.

use clap::Parser;
use schemagen::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Cli::parse().run().await?;
    Ok(())
}
