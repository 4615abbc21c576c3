use axum::extract::State;
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;

use storefront_core::model::{Order, OrderStatus, Page};

use super::error::found;
use super::{ApiError, ApiPath, ApiQuery, PageParams};
use crate::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct StaleQuery {
    pub status: String,
    pub before: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct AttentionQuery {
    #[serde(alias = "cutoffDate")]
    pub cutoff_date: NaiveDateTime,
}

/// Newest first.
pub async fn list(
    State(app): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Order>>, ApiError> {
    let req = app.page_request(&params)?;
    Ok(Json(app.store().find_orders(req).await?))
}

pub async fn by_id(State(app): State<AppState>, ApiPath(id): ApiPath<u64>) -> Result<Json<Order>, ApiError> {
    let order = found(app.store().find_order(id).await?, || format!("order {id}"))?;
    Ok(Json(order))
}

pub async fn by_customer(
    State(app): State<AppState>,
    ApiPath(customer_id): ApiPath<u64>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(app.store().find_orders_by_customer(customer_id).await?))
}

pub async fn by_status(
    State(app): State<AppState>,
    ApiPath(status): ApiPath<String>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let status: OrderStatus = status.parse()?;
    Ok(Json(app.store().find_orders_by_status(status).await?))
}

pub async fn stale(
    State(app): State<AppState>,
    ApiQuery(q): ApiQuery<StaleQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let status: OrderStatus = q.status.parse()?;
    Ok(Json(app.store().find_stale_orders(status, q.before).await?))
}

/// PENDING or PROCESSING orders older than the cutoff.
pub async fn needs_attention(
    State(app): State<AppState>,
    ApiQuery(q): ApiQuery<AttentionQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(app.store().find_orders_needing_attention(q.cutoff_date).await?))
}
