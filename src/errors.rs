// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for event store operations

use thiserror::Error;

use crate::domain::TodoListId;

/// Errors that can occur while reading from or appending to an event store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium could not be reached (transient)
    #[error("Event store unavailable: {0}")]
    Unavailable(String),

    /// Expected-sequence precondition failed
    #[error("Concurrency conflict on {aggregate_id}: expected sequence {expected}, found {actual}")]
    Conflict {
        /// Aggregate whose log moved on
        aggregate_id: TodoListId,
        /// Sequence the caller based its command on
        expected: u64,
        /// Sequence actually present in the store
        actual: u64,
    },

    /// An append batch named an aggregate other than the target
    #[error("Event for aggregate {found} cannot be appended to {expected}")]
    AggregateMismatch {
        expected: TodoListId,
        found: TodoListId,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Whether a caller may retry the whole synchronization cycle
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Conflict { .. })
    }
}

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(feature = "nats")]
impl From<async_nats::Error> for StoreError {
    fn from(err: async_nats::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}
