//! REST server startup

use anyhow::{anyhow, Result};
use axum::serve;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::server::{routing::create_router, AppState};

/// Open the database, bind and serve until Ctrl-C
pub async fn start_server(config: Config) -> Result<()> {
  let state = AppState::from_config(&config)?;
  bentley::info!("Database: {}", config.database_path.display());

  let app = create_router(state).layer(
    ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()),
  );

  let listener = TcpListener::bind(config.bind).await?;
  bentley::success!("Server listening on {}", listener.local_addr()?);

  serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow!("Server error: {e}"))?;

  bentley::info!("Server shut down gracefully");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("Failed to listen for shutdown signal: {e}");
  }
}
