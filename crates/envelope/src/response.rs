// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Success envelope and JSON response assembly
//!
//! Success responses share one shape: a JSON object `{"ok": true}` merged
//! with whatever the handler returned. [`Envelope`] wraps the handler's
//! payload and produces that body with status 200; [`json_response`] is the
//! shared assembly step that sets the status code, applies headers, and
//! serializes the body, used by both the envelope and [`ApiError`].

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::ApiError;

/// Result type for API handlers: an enveloped payload or an [`ApiError`].
pub type ApiResult<T = ()> = Result<Envelope<T>, ApiError>;

/// Success envelope around a handler's payload.
///
/// The payload must serialize to a JSON object (or to nothing at all, for
/// handlers with no data to return). An `ok` key already present in the
/// payload is preserved rather than overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<T = ()>(pub T);

impl Envelope {
    /// Envelope with no payload, serialized as just `{"ok": true}`.
    pub fn empty() -> Self {
        Self(())
    }
}

impl<T> IntoResponse for Envelope<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let value = match serde_json::to_value(&self.0) {
            Ok(value) => value,
            Err(source) => {
                error!(error = %source, "failed to serialize response payload");
                return ApiError::internal("failed to serialize response").into_response();
            }
        };

        let body = match value {
            Value::Object(mut fields) => {
                fields.entry("ok").or_insert(Value::Bool(true));
                Value::Object(fields)
            }
            Value::Null => serde_json::json!({ "ok": true }),
            other => {
                error!(
                    payload = %other,
                    "response payload must serialize to a JSON object"
                );
                return ApiError::internal("response payload must be a JSON object")
                    .into_response();
            }
        };

        json_response(StatusCode::OK, HeaderMap::new(), &body)
    }
}

/// Assemble a JSON response from a status code, headers, and a body.
///
/// Non-JSON responses (plain strings, redirects) are outside this layer and
/// use the framework's own [`IntoResponse`] implementations directly.
pub fn json_response<T>(status: StatusCode, headers: HeaderMap, body: &T) -> Response
where
    T: Serialize,
{
    (status, headers, Json(body)).into_response()
}
