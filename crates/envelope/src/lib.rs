// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Response envelope, API error, and caller identity primitives
//!
//! This crate standardizes how API handlers format responses, how handler
//! errors become HTTP status codes, and how a caller identity is read from
//! a request header. Handlers stay pure: they return
//! [`ApiResult<T>`](ApiResult) and the [`axum::response::IntoResponse`]
//! implementations on [`Envelope`] and [`ApiError`] take care of writing
//! the HTTP response at the framework boundary.
//!
//! # Module Structure
//!
//! - [`response`]: Success envelope (`{"ok": true, ...}`) and JSON response assembly
//! - [`error`]: [`ApiError`] carrying a message, status code, and response headers
//! - [`identity`]: [`CallerId`] extractor for the `user-id` request header
//!
//! # Wire Contract
//!
//! - Success bodies are a JSON object `{"ok": true}` merged with the
//!   handler's payload, served with status 200
//! - Error bodies are `{"error": <message>}` with the status code carried
//!   by the error (500 when unspecified) and the error's headers applied
//! - The caller identity header must be present, singular, and parse as an
//!   integer; requests are otherwise rejected with 401 or 400

pub mod error;
pub mod identity;
pub mod response;

pub use error::ApiError;
pub use identity::{CallerId, USER_ID_HEADER};
pub use response::{ApiResult, Envelope, json_response};
