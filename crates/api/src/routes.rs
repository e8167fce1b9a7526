// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides route configuration and handlers for the user API server.

pub mod handlers;

use axum::{
    Router, middleware,
    routing::get,
};
use handlers::{health_handler, me_handler, update_me_handler};

use crate::{
    metrics::metrics_handler,
    middleware::{RateLimiter, rate_limiting_middleware, track_metrics},
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Create application routes with conditional rate limiting
#[allow(clippy::needless_pass_by_value)] // We need to clone the rate limiter for middleware
pub fn create_routes(rate_limiter: RateLimiter) -> Router<ServerState> {
    // Health and metrics endpoints are not rate limited for monitoring purposes
    let ops_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler));

    // Documentation endpoints are not rate limited
    let docs_routes = Router::new()
        .route("/api-doc/openapi.json", get(openapi_spec))
        .route("/swagger-ui", get(swagger_ui));

    // API endpoints - conditionally apply rate limiting
    let mut api_routes = Router::new().route("/me", get(me_handler).put(update_me_handler));

    // Only apply rate limiting middleware if enabled
    if rate_limiter.is_enabled() {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            rate_limiter.clone(),
            rate_limiting_middleware,
        ));
    }

    let v1 = Router::new().nest("/v1", api_routes);

    // route_layer so the matched path is available for metrics labels
    Router::new()
        .merge(ops_routes)
        .merge(docs_routes)
        .merge(v1)
        .route_layer(middleware::from_fn(track_metrics))
}
