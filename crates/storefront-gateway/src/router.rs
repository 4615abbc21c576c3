//! Axum router wiring.
//!
//! `/api/*` routes are wrapped by the request-tracking middleware; the
//! operational endpoints are not, so probes and scrapes do not show up in
//! the request metrics.

use axum::{middleware, routing::get, Router};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let api = api::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        obs::track_requests,
    ));

    Router::new()
        .nest("/api", api)
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
