// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Account storage module
//!
//! This module provides the account store that handlers reach through
//! server state. The store is an in-memory map with a capacity bound; the
//! service owns no persistent data model, so the store stands in for the
//! database client a deployment would inject here instead.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use envelope::{ApiError, CallerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Default maximum number of accounts held in memory
const DEFAULT_CAPACITY: usize = 100_000;

/// Errors raised by account store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store refuses new accounts once the capacity bound is reached
    #[error("account store is full ({capacity} entries)")]
    CapacityExceeded {
        /// Capacity bound of the store
        capacity: usize,
    },
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        ApiError::new(source.to_string()).with_status(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// An account record as stored and as served to its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Account {
    /// Identity the account belongs to
    #[schema(example = 7)]
    pub user_id: i64,
    /// Display name chosen by the caller
    #[schema(example = "alice")]
    pub display_name: String,
    /// When the account was first created
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    /// When the account was last updated
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

/// Concurrent in-memory account store with a capacity bound
#[derive(Debug)]
pub struct AccountStore {
    accounts: DashMap<i64, Account>,
    capacity: usize,
}

impl AccountStore {
    /// Create a store with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a store holding at most `capacity` accounts
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            accounts: DashMap::new(),
            capacity,
        }
    }

    /// Fetch the account belonging to the caller, if one exists
    pub fn fetch(&self, caller: CallerId) -> Option<Account> {
        self.accounts.get(&caller.0).map(|entry| entry.value().clone())
    }

    /// Create or update the caller's account with a new display name
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CapacityExceeded`] when the caller has no
    /// account yet and the store is full.
    pub fn upsert_display_name(
        &self,
        caller: CallerId,
        display_name: String,
    ) -> Result<Account, StoreError> {
        if let Some(mut entry) = self.accounts.get_mut(&caller.0) {
            entry.display_name = display_name;
            entry.updated_at = Utc::now();
            return Ok(entry.clone());
        }

        if self.accounts.len() >= self.capacity {
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let now = Utc::now();
        let account = Account {
            user_id: caller.0,
            display_name,
            created_at: now,
            updated_at: now,
        };
        self.accounts.insert(caller.0, account.clone());
        Ok(account)
    }

    /// Number of accounts currently stored
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Capacity bound of the store
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_missing_account() {
        let store = AccountStore::new();
        assert!(store.fetch(CallerId(1)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn upsert_creates_account() {
        let store = AccountStore::new();
        let account = store
            .upsert_display_name(CallerId(7), "alice".to_string())
            .expect("store has room");

        assert_eq!(account.user_id, 7);
        assert_eq!(account.display_name, "alice");
        assert_eq!(account.created_at, account.updated_at);
        assert_eq!(store.len(), 1);

        let fetched = store.fetch(CallerId(7)).expect("account was created");
        assert_eq!(fetched, account);
    }

    #[test]
    fn upsert_updates_existing_account() {
        let store = AccountStore::new();
        let created = store
            .upsert_display_name(CallerId(7), "alice".to_string())
            .expect("store has room");
        let updated = store
            .upsert_display_name(CallerId(7), "alicia".to_string())
            .expect("update always succeeds");

        assert_eq!(updated.display_name, "alicia");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn capacity_bound_rejects_new_accounts() {
        let store = AccountStore::with_capacity(2);
        store
            .upsert_display_name(CallerId(1), "a".to_string())
            .expect("store has room");
        store
            .upsert_display_name(CallerId(2), "b".to_string())
            .expect("store has room");

        let error = store
            .upsert_display_name(CallerId(3), "c".to_string())
            .expect_err("store is full");
        assert!(matches!(
            error,
            StoreError::CapacityExceeded { capacity: 2 }
        ));

        // Updates to existing accounts still go through
        store
            .upsert_display_name(CallerId(1), "a2".to_string())
            .expect("updates bypass the capacity bound");
    }

    #[test]
    fn store_error_maps_to_service_unavailable() {
        let error: ApiError = StoreError::CapacityExceeded { capacity: 2 }.into();
        assert_eq!(error.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.message(), "account store is full (2 entries)");
    }
}
