//! Request instrumentation and log setup.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing_subscriber::{fmt, EnvFilter};

use crate::app_state::AppState;

/// Install the `fmt` subscriber. `RUST_LOG` wins; otherwise `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

/// Hold an active-request slot for the whole handler.
///
/// The guard lives across `next.run`, so the slot is released and the
/// response-time sample recorded whether the handler returns, fails, or its
/// future is dropped because the client went away.
pub async fn track_requests(State(app): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let guard = app.metrics().begin_request();
    let resp = next.run(req).await;

    tracing::debug!(
        %method,
        %path,
        status = resp.status().as_u16(),
        elapsed_us = guard.elapsed().as_micros() as u64,
        "request handled"
    );
    resp
}
