use axum::extract::State;
use axum::Json;

use storefront_core::model::{Page, ProductDto};

use super::error::found;
use super::{ApiError, ApiPath, ApiQuery, PageParams};
use crate::app_state::AppState;

pub const PRODUCT_SEARCH_TIME: &str = "product.search.time";
pub const PRODUCTS_ACCESSED: &str = "products.accessed.total";
pub const PRODUCTS_PAGE_SIZE: &str = "products.page.size";
pub const PRODUCTS_AVAILABLE_ACCESSED: &str = "products.available.accessed";
pub const PRODUCTS_AVAILABLE_COUNT: &str = "products.available.count";

pub async fn list(
    State(app): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<ProductDto>>, ApiError> {
    let req = app.page_request(&params)?;
    let metrics = app.metrics();

    let timer = metrics.start_timer();
    let result = app.store().find_products(req).await;
    metrics.stop_timer(timer, PRODUCT_SEARCH_TIME);
    let page = result?;

    metrics.increment_counter(PRODUCTS_ACCESSED);
    metrics.set_gauge(PRODUCTS_PAGE_SIZE, f64::from(req.size));

    Ok(Json(page.map(|p| ProductDto::from(&p))))
}

pub async fn by_id(
    State(app): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<ProductDto>, ApiError> {
    let product = found(app.store().find_product(id).await?, || format!("product {id}"))?;
    Ok(Json(ProductDto::from(&product)))
}

pub async fn by_category(
    State(app): State<AppState>,
    ApiPath(category): ApiPath<String>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let rows = app.store().find_products_by_category(&category).await?;
    Ok(Json(rows.iter().map(ProductDto::from).collect()))
}

pub async fn available(State(app): State<AppState>) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let metrics = app.metrics();

    let timer = metrics.start_timer();
    let result = app.store().find_available_products().await;
    metrics.stop_timer(timer, PRODUCT_SEARCH_TIME);
    let rows = result?;

    metrics.increment_counter(PRODUCTS_AVAILABLE_ACCESSED);
    metrics.set_gauge(PRODUCTS_AVAILABLE_COUNT, rows.len() as f64);

    Ok(Json(rows.iter().map(ProductDto::from).collect()))
}

pub async fn low_stock(
    State(app): State<AppState>,
    ApiPath(min_stock): ApiPath<u32>,
) -> Result<Json<Vec<ProductDto>>, ApiError> {
    let rows = app.store().find_products_with_stock_below(min_stock).await?;
    Ok(Json(rows.iter().map(ProductDto::from).collect()))
}
