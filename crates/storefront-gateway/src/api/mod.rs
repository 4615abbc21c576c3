//! REST endpoints under `/api`.
//!
//! Handlers forward page, size, and filter parameters to the store unchanged
//! apart from range checks. Every route here runs inside a `RequestGuard`
//! installed by `obs::track_requests`.

pub mod customers;
pub mod error;
pub mod extract;
pub mod orders;
pub mod products;

use axum::{routing::get, Router};
use serde::Deserialize;

use crate::app_state::AppState;

pub use error::ApiError;
pub use extract::{ApiPath, ApiQuery};

/// `?page=&size=` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/available", get(products::available))
        .route("/products/category/:category", get(products::by_category))
        .route("/products/low-stock/:min_stock", get(products::low_stock))
        .route("/products/:id", get(products::by_id))
        .route("/customers", get(customers::list))
        .route("/customers/search/:last_name", get(customers::by_last_name))
        .route("/customers/email/:email", get(customers::by_email))
        .route("/customers/:id", get(customers::by_id))
        .route("/orders", get(orders::list))
        .route("/orders/stale", get(orders::stale))
        .route("/orders/needs-attention", get(orders::needs_attention))
        .route("/orders/customer/:customer_id", get(orders::by_customer))
        .route("/orders/status/:status", get(orders::by_status))
        .route("/orders/:id", get(orders::by_id))
}
