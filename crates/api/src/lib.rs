// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! User API Server Implementation
//!
//! This crate provides the main HTTP server for the user API service, built with Axum
//! and designed for production use with comprehensive configuration, middleware, and
//! graceful shutdown capabilities. Handlers format every response through the
//! [`envelope`] layer: success payloads become `{"ok": true, ...}` bodies and
//! failures become `{"error": ...}` bodies with the status carried by the error.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Server lifecycle error types (request errors live in [`envelope`])
//! - [`accounts`]: In-memory account store injected into handlers through state
//! - [`state`]: Shared application state management with cancellation token support
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route configuration and HTTP request handlers
//! - [`middleware`]: Identity-keyed rate limiting and request metrics
//! - [`metrics`]: Prometheus metrics and the exposition endpoint
//! - [`openapi`]: `OpenAPI` specification and Swagger UI endpoints for API documentation
//!
//! # Key Features
//!
//! - **Standardized Responses**: One envelope shape for successes, one for errors
//! - **Caller Identity**: Typed extraction of the `user-id` header with 401/400 rejections
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken` with timeouts
//! - **Rate Limiting**: Identity-keyed request limiting with configurable requests per minute
//! - **Health Monitoring**: Health endpoint reporting version, environment, and store occupancy
//! - **Comprehensive Middleware**: Request tracing, CORS, timeouts, and request ids

pub mod accounts;
pub mod config;
pub mod docs;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use accounts::{Account, AccountStore};
pub use config::{Environment, ServerConfig};
pub use envelope::{ApiError, ApiResult, CallerId, Envelope, USER_ID_HEADER};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState};
