//! Application setup and runtime.

use crate::{http, relay::Relay, store::LogStore};
use tokio::signal;
use tracing::info;

pub mod config;

pub use config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub store: LogStore,
  pub relay: Relay,
}

impl AppState {
  pub fn new(store: LogStore, relay: Relay) -> Self {
    Self { store, relay }
  }
}

/// Start the HTTP server with configured environment.
pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();

  let config = Config::from_env()?;
  let relay = Relay::new(
    config.upstream_url.clone(),
    config.upstream_insecure,
    config.upstream_timeout,
  )?;
  let state = AppState::new(LogStore::new(), relay);

  let app = http::build_router(state);

  info!("kiosk page:           http://{}/", config.addr);
  info!("attendance logs API:  http://{}/api/logs", config.addr);
  info!("relay upstream:       {}", config.upstream_url);

  let listener = tokio::net::TcpListener::bind(config.addr).await?;
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if signal::ctrl_c().await.is_ok() {
      info!("received Ctrl+C, shutting down");
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut term) => {
        term.recv().await;
        info!("received terminate signal, shutting down");
      }
      Err(_) => std::future::pending::<()>().await,
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
