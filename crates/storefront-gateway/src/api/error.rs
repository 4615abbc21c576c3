//! HTTP mapping for `StorefrontError`.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use storefront_core::error::{ClientCode, StorefrontError};

/// Handler error: a `StorefrontError` rendered as `{"code", "msg"}`.
#[derive(Debug)]
pub struct ApiError(pub StorefrontError);

impl From<StorefrontError> for ApiError {
    fn from(e: StorefrontError) -> Self {
        Self(e)
    }
}

impl From<PathRejection> for ApiError {
    fn from(r: PathRejection) -> Self {
        Self(StorefrontError::BadRequest(r.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(r: QueryRejection) -> Self {
        Self(StorefrontError::BadRequest(r.body_text()))
    }
}

fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::BadRequest | ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::Conflict => StatusCode::CONFLICT,
        ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = status_for(code);
        // internal details stay in the log
        let msg = match &self.0 {
            StorefrontError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "code": code.as_str(), "msg": msg }))).into_response()
    }
}

/// `Some(row)` or a `NotFound` naming what was looked up.
pub fn found<T>(row: Option<T>, what: impl FnOnce() -> String) -> Result<T, ApiError> {
    row.ok_or_else(|| ApiError(StorefrontError::NotFound(what())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_statuses() {
        assert_eq!(status_for(ClientCode::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ClientCode::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ClientCode::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ClientCode::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
