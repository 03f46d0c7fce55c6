//! Lookout REST Server
//!
//! Resolves keywords to subreddit submissions over HTTP, caching fetched results in SQLite.

use anyhow::Result;
use clap::Parser;

use lookout::config::{Args, Config};
use lookout::server::startup::start_server;

#[tokio::main]
async fn main() -> Result<()> {
  let config = Config::from(Args::parse());

  bentley::init_tracing("lookout", config.verbose);

  bentley::info!("Starting Lookout REST Server v{}", env!("CARGO_PKG_VERSION"));
  bentley::info!("Binding to address: {}", config.bind);

  start_server(config).await?;

  Ok(())
}
