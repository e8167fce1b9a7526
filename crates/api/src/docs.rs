// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document definition
//!
//! Collects the annotated handlers and schema types into the service's
//! `OpenAPI` document, served by the [`crate::openapi`] endpoints.

use utoipa::OpenApi;

use crate::{
    accounts::Account,
    config::Environment,
    routes::handlers::UpdateAccountRequest,
    state::{HealthCheck, HealthStatus},
};

/// `OpenAPI` document for the user API service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        description = "Identity-aware JSON API service with standardized response envelopes"
    ),
    paths(
        crate::routes::handlers::health_handler,
        crate::routes::handlers::me_handler,
        crate::routes::handlers::update_me_handler
    ),
    components(schemas(
        Account,
        Environment,
        HealthCheck,
        HealthStatus,
        UpdateAccountRequest
    )),
    tags(
        (name = "health", description = "Service health endpoints"),
        (name = "account", description = "Caller account endpoints")
    )
)]
pub struct ApiDoc;
