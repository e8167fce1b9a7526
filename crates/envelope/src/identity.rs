// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Caller identity extraction
//!
//! The caller identifies itself through the `user-id` request header. The
//! header must be present exactly once and hold an integer. [`CallerId`]
//! implements [`FromRequestParts`], so handlers take the identity as a
//! typed argument and requests without a usable identity never reach them.

use std::fmt;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, request::Parts},
};

use crate::error::ApiError;

/// Request header carrying the caller identity.
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("user-id");

/// Identity of the caller, parsed from the `user-id` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallerId(pub i64);

impl CallerId {
    /// Parse the caller identity from request headers.
    ///
    /// # Errors
    ///
    /// Returns a 401 [`ApiError`] if the header is absent or repeated, and
    /// a 400 [`ApiError`] if its value is not an integer.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let mut values = headers.get_all(&USER_ID_HEADER).iter();

        let Some(value) = values.next() else {
            return Err(ApiError::unauthorized("user id not provided"));
        };

        // A repeated header is ambiguous, treated the same as no identity.
        if values.next().is_some() {
            return Err(ApiError::unauthorized("user id not provided"));
        }

        let id = value
            .to_str()
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .ok_or_else(|| ApiError::bad_request("user id is expected to be an integer"))?;

        Ok(Self(id))
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}
