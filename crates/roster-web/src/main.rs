//! # Roster
//!
//! A small server-rendered people directory: HTML pages composed from a
//! shared layout, backed by a read-only SQLite lookup of people records.

mod app;
mod pages;
mod store;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::build_app;
use crate::store::SqlitePeopleStore;

/// Command-line configuration, fixed at startup
#[derive(Debug, Parser)]
#[command(name = "roster-web", version, about)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// SQLite database URL holding the people table
    #[arg(long, default_value = "sqlite:db/people.db")]
    database_url: String,

    /// Directory served under /static/
    #[arg(long, default_value = "static")]
    static_root: PathBuf,
}

/// Initialize tracing for the process
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("Starting roster-web v{}", env!("CARGO_PKG_VERSION"));

    let store = SqlitePeopleStore::connect(&cli.database_url).await?;
    info!(database_url = %cli.database_url, "Record store connected");

    let server = build_app(Arc::new(store), cli.static_root)?.bind(cli.bind);
    server.serve().await?;

    Ok(())
}
