use crate::constants::{INVALID_BODY_MESSAGE, QUERY_REQUIRED_MESSAGE, UPSTREAM_FAILURE_MESSAGE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Error payload returned to clients as `{ "error": message }`.
///
/// Messages are fixed strings; upstream details stay in the logs.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ApiError {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip)]
    pub code: u16,
}

impl ApiError {
    /// Missing or blank query.
    pub fn query_required() -> Self {
        api_error(StatusCode::BAD_REQUEST, QUERY_REQUIRED_MESSAGE)
    }

    /// Body that is not a JSON object of the expected shape.
    pub fn invalid_body() -> Self {
        api_error(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE)
    }

    /// Any failure reaching or reading the upstream service.
    pub fn upstream() -> Self {
        api_error(StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILURE_MESSAGE)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}, {})", self.code, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

/// Helper function to create API errors
pub fn api_error(status: StatusCode, message: &str) -> ApiError {
    ApiError {
        message: message.to_string(),
        code: status.as_u16(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_only_the_error_field() {
        let json = serde_json::to_value(ApiError::query_required()).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Query is required" }));
    }

    #[test]
    fn status_codes_match_error_kind() {
        assert_eq!(ApiError::query_required().code, 400);
        assert_eq!(ApiError::invalid_body().code, 400);
        assert_eq!(ApiError::upstream().code, 500);
        assert_eq!(
            ApiError::upstream().into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
