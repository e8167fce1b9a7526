// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP request handlers module
//!
//! This module provides HTTP request handlers for the user API server.
//! Handlers are pure functions over the request and server state: they
//! return [`ApiResult`] and the envelope layer turns the outcome into the
//! HTTP response.

use axum::{Json, extract::State};
use envelope::{ApiError, ApiResult, CallerId, Envelope};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::{
    accounts::Account,
    state::{HealthCheck, ServerState},
};

/// Display names refused for self-service profiles
const RESERVED_DISPLAY_NAMES: [&str; 3] = ["root", "admin", "system"];

/// Maximum accepted display name length in characters
const MAX_DISPLAY_NAME_CHARS: usize = 64;

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the current health status of the API service including version, environment information, and account store occupancy.",
    responses(
        (status = 200, description = "Service health report", body = HealthCheck)
    )
)]
pub async fn health_handler(State(state): State<ServerState>) -> ApiResult<HealthCheck> {
    Ok(Envelope(state.health_check()))
}

/// Fetch the calling user's account
///
/// # Errors
///
/// Returns a 404 [`ApiError`] when the caller has no account yet, and the
/// identity errors (401/400) when the `user-id` header is unusable.
#[utoipa::path(
    get,
    path = "/v1/me",
    tag = "account",
    summary = "Fetch the caller's account",
    description = "Returns the account belonging to the identity in the user-id request header.",
    responses(
        (status = 200, description = "The caller's account", body = Account),
        (status = 400, description = "The user-id header is not an integer", body = String),
        (status = 401, description = "The user-id header is absent or repeated", body = String),
        (status = 404, description = "The caller has no account", body = String)
    )
)]
pub async fn me_handler(
    State(state): State<ServerState>,
    caller: CallerId,
) -> ApiResult<Account> {
    let account = state
        .accounts()
        .fetch(caller)
        .ok_or_else(|| ApiError::not_found("account not found"))?;

    Ok(Envelope(account))
}

/// Account update request
///
/// Carries the profile fields a caller may change on its own account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    /// New display name for the account
    #[schema(example = "alice")]
    display_name: String,
}

impl UpdateAccountRequest {
    /// Validate the request and return the normalized display name
    ///
    /// # Errors
    ///
    /// Returns a 400 [`ApiError`] for an empty or oversized display name and
    /// a 403 [`ApiError`] for a reserved one.
    pub fn validate(&self) -> Result<String, ApiError> {
        let display_name = self.display_name.trim();

        if display_name.is_empty() {
            return Err(ApiError::bad_request("display name cannot be empty"));
        }
        if display_name.chars().count() > MAX_DISPLAY_NAME_CHARS {
            return Err(ApiError::bad_request(format!(
                "display name cannot exceed {MAX_DISPLAY_NAME_CHARS} characters"
            )));
        }
        if RESERVED_DISPLAY_NAMES
            .iter()
            .any(|reserved| display_name.eq_ignore_ascii_case(reserved))
        {
            return Err(ApiError::forbidden("display name is reserved"));
        }

        Ok(display_name.to_string())
    }
}

/// Create or update the calling user's account
///
/// # Errors
///
/// Returns the validation errors from [`UpdateAccountRequest::validate`],
/// a 503 [`ApiError`] when the account store is full, and the identity
/// errors (401/400) when the `user-id` header is unusable.
#[utoipa::path(
    put,
    path = "/v1/me",
    tag = "account",
    summary = "Create or update the caller's account",
    description = "Creates the caller's account on first use and updates its display name afterwards.",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "The stored account", body = Account),
        (status = 400, description = "Invalid display name or user-id header", body = String),
        (status = 401, description = "The user-id header is absent or repeated", body = String),
        (status = 403, description = "The display name is reserved", body = String),
        (status = 503, description = "The account store is full", body = String)
    )
)]
pub async fn update_me_handler(
    State(state): State<ServerState>,
    caller: CallerId,
    Json(request): Json<UpdateAccountRequest>,
) -> ApiResult<Account> {
    let display_name = request.validate()?;

    let account = state.accounts().upsert_display_name(caller, display_name)?;
    info!(caller = %caller, "account profile updated");

    Ok(Envelope(account))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    fn request(display_name: &str) -> UpdateAccountRequest {
        UpdateAccountRequest {
            display_name: display_name.to_string(),
        }
    }

    #[test]
    fn valid_display_name_is_normalized() {
        let name = request("  alice  ").validate().expect("valid name");
        assert_eq!(name, "alice");
    }

    #[test]
    fn empty_display_name_is_rejected() {
        let error = request("   ").validate().expect_err("empty name");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.message(), "display name cannot be empty");
    }

    #[test]
    fn oversized_display_name_is_rejected() {
        let error = request(&"x".repeat(65)).validate().expect_err("too long");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn reserved_display_names_are_forbidden() {
        for name in ["root", "Admin", "SYSTEM"] {
            let error = request(name).validate().expect_err("reserved name");
            assert_eq!(error.status(), StatusCode::FORBIDDEN);
            assert_eq!(error.message(), "display name is reserved");
        }
    }

    #[test]
    fn display_name_length_counts_characters() {
        // 64 multibyte characters are within the limit
        let name = "ä".repeat(64);
        assert!(request(&name).validate().is_ok());
        assert!(request(&"ä".repeat(65)).validate().is_err());
    }
}
