use axum::extract::State;
use axum::Json;

use storefront_core::model::{Customer, Page};

use super::error::found;
use super::{ApiError, ApiPath, ApiQuery, PageParams};
use crate::app_state::AppState;

pub async fn list(
    State(app): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<Customer>>, ApiError> {
    let req = app.page_request(&params)?;
    Ok(Json(app.store().find_customers(req).await?))
}

pub async fn by_id(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<Customer>, ApiError> {
    let customer = found(app.store().find_customer(id).await?, || format!("customer {id}"))?;
    Ok(Json(customer))
}

pub async fn by_last_name(
    State(app): State<AppState>,
    ApiPath(last_name): ApiPath<String>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(app.store().find_customers_by_last_name(&last_name).await?))
}

pub async fn by_email(
    State(app): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer = found(app.store().find_customer_by_email(&email).await?, || {
        format!("customer with email {email}")
    })?;
    Ok(Json(customer))
}
