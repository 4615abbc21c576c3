//! Storefront gateway binary.
//!
//! Usage: `storefront-gateway [config.yaml]` (default `storefront.yaml`).
//! On Ctrl-C the gateway flips `/readyz` to 503, waits the configured grace
//! period, then stops accepting connections and drains in-flight requests.

use std::time::Duration;

use storefront_core::error::{Result, StorefrontError};
use storefront_gateway::{app_state::AppState, config, obs, router};

#[tokio::main]
async fn main() {
    obs::init_logging();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "storefront-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "storefront.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;
    let grace = Duration::from_millis(cfg.server.shutdown_grace_ms);

    let state = AppState::from_config(cfg).await?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "storefront-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| StorefrontError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state, grace))
        .await
        .map_err(|e| StorefrontError::Internal(format!("server failed: {e}")))?;

    tracing::info!("storefront-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState, grace: Duration) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable; shutting down");
    }
    state.set_draining();
    tracing::info!(grace_ms = grace.as_millis() as u64, "draining");
    tokio::time::sleep(grace).await;
}
