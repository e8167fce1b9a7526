// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the user API server,
//! including configuration, the account store, and coordinated cancellation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    accounts::AccountStore,
    config::{Environment, ServerConfig},
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Account store handlers read and write through
    accounts: Arc<AccountStore>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `accounts` - Account store shared across handlers
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        accounts: Arc<AccountStore>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            accounts,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Account store shared across handlers
    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    /// Produce a health report for the service
    pub fn health_check(&self) -> HealthCheck {
        let status = if self.accounts.len() >= self.accounts.capacity() {
            HealthStatus::Degraded {
                reason: Box::from("account store at capacity"),
            }
        } else {
            HealthStatus::Up
        };

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            accounts: self.accounts.len(),
        }
    }
}

/// Health status of the service
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or has critical failures
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },

    /// Service is operational but experiencing performance issues or partial failures
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Number of accounts currently stored
    pub accounts: usize,
}

#[cfg(test)]
mod tests {
    use envelope::CallerId;

    use super::*;

    fn state_with_store(store: AccountStore) -> ServerState {
        ServerState::new(
            ServerConfig::for_testing(),
            Arc::new(store),
            CancellationToken::new(),
        )
    }

    #[test]
    fn server_state_creation() {
        let state = state_with_store(AccountStore::new());
        assert!(!state.cancellation_token.is_cancelled());
        assert!(state.accounts().is_empty());
    }

    #[test]
    fn server_state_with_cancellation_token() {
        let token = CancellationToken::new();
        let state = ServerState::new(
            ServerConfig::for_testing(),
            Arc::new(AccountStore::new()),
            token.clone(),
        );

        assert!(!state.cancellation_token.is_cancelled());

        // Test that the tokens are linked
        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
    }

    #[test]
    fn health_check_reports_up() {
        let state = state_with_store(AccountStore::new());
        let health = state.health_check();

        assert_eq!(health.status, HealthStatus::Up);
        assert_eq!(&*health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.environment, Environment::Testing);
        assert_eq!(health.accounts, 0);
    }

    #[test]
    fn health_check_reports_degraded_at_capacity() {
        let store = AccountStore::with_capacity(1);
        store
            .upsert_display_name(CallerId(1), "a".to_string())
            .expect("store has room");

        let health = state_with_store(store).health_check();
        assert_eq!(
            health.status,
            HealthStatus::Degraded {
                reason: Box::from("account store at capacity")
            }
        );
        assert_eq!(health.accounts, 1);
    }
}
