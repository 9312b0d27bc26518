//! Binary crate for the weather alert service.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Serving the alert and notification-history HTTP endpoints
//! - API-key authentication and mapping failures to status codes

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod api;
mod auth;
mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
