// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! API error type with HTTP response mapping
//!
//! [`ApiError`] is the single error type handlers fail with. It carries a
//! human-readable message, the status code to answer with (500 when not
//! specified), and any headers the response must include. The error is
//! constructed at the point of failure, propagated with `?`, and consumed
//! once when the response is written.

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::json_response;

/// Error returned by API handlers, mapped onto an HTTP error response.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Message served in the response body
    message: String,
    /// Status code of the response
    status: StatusCode,
    /// Headers applied to the response
    headers: HeaderMap,
}

impl ApiError {
    /// Create an error with the given message and the default 500 status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: HeaderMap::new(),
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::BAD_REQUEST)
    }

    /// Create a 401 Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::UNAUTHORIZED)
    }

    /// Create a 403 Forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::FORBIDDEN)
    }

    /// Create a 404 Not Found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::NOT_FOUND)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Set the status code served with this error.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Append a header to be served with this error's response.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Status code this error answers with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Message served in the response body.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Headers applied to the response.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        json_response(self.status, self.headers, &body)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::RETRY_AFTER;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    }

    #[test]
    fn default_status_is_internal_server_error() {
        let error = ApiError::new("something broke");
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "something broke");
        assert!(error.headers().is_empty());
    }

    #[test]
    fn constructors_set_expected_statuses() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_is_the_message() {
        let error = ApiError::forbidden("no access to this resource");
        assert_eq!(error.to_string(), "no access to this resource");
    }

    #[tokio::test]
    async fn forbidden_error_response() {
        let response = ApiError::forbidden("no access to this resource").into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "no access to this resource" }));
    }

    #[tokio::test]
    async fn error_headers_are_served() {
        let response = ApiError::new("slow down")
            .with_status(StatusCode::TOO_MANY_REQUESTS)
            .with_header(RETRY_AFTER, HeaderValue::from(30u64))
            .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(RETRY_AFTER),
            Some(&HeaderValue::from(30u64))
        );

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "slow down" }));
    }
}
