// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! This module defines the event storage contract for TodoList aggregates and
//! its implementations.
//!
//! # Architecture
//!
//! ```text
//! TodoList command → uncommitted DomainEvents → EventStore::append
//!                                                    ↓
//!                  replay ← StoredEvents ← EventStore::fetch_by_aggregate
//! ```
//!
//! # Event Store Requirements
//!
//! 1. **Append-Only**: events are never updated or deleted
//! 2. **Ordered**: `sequence` starts at 1 and is gapless per aggregate
//! 3. **Atomic**: an append is all-or-nothing and sequence assignment is
//!    atomic with respect to other appends on the same aggregate
//! 4. **Order-Preserving**: the batch keeps its relative order
//! 5. **Replay**: fetch returns the whole log from the beginning
//!
//! # Concurrency Control
//!
//! `append` takes an optional expected sequence. `None` is the optimistic
//! baseline: the append always lands once the store is reachable, even if
//! the caller's view is stale. `Some(n)` is the hardened variant: the append
//! is refused with [`StoreError::Conflict`] unless the log still ends at `n`.
//!
//! # Implementations
//!
//! - [`InMemoryEventStore`] - process-local, used by tests and the demo driver
//! - [`NatsEventStore`] - NATS JetStream (feature `nats`)

use async_trait::async_trait;

use crate::domain::TodoListId;
use crate::errors::{StoreError, StoreResult};
use crate::events::{DomainEvent, StoredEvent};

pub mod memory;
#[cfg(feature = "nats")]
pub mod nats;

pub use memory::InMemoryEventStore;
#[cfg(feature = "nats")]
pub use nats::NatsEventStore;

/// Append-only, per-aggregate ordered event log
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Read an aggregate's whole log, ordered by `sequence` ascending
    ///
    /// An aggregate with no events yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the underlying medium cannot be reached
    async fn fetch_by_aggregate(&self, aggregate_id: TodoListId) -> StoreResult<Vec<StoredEvent>>;

    /// Append a batch to an aggregate's log
    ///
    /// # Arguments
    ///
    /// * `aggregate_id` - Log to append to; every event must name it
    /// * `events` - Events in the order they must be stored
    /// * `expected_sequence` - Hardened mode precondition (see module docs)
    ///
    /// # Returns
    ///
    /// The sequence of the last event in the log after the append (0 when
    /// the log is still empty).
    ///
    /// # Errors
    ///
    /// - `Conflict` if `expected_sequence` is given and the log moved on
    /// - `AggregateMismatch` if an event names another aggregate
    /// - `Unavailable` if writing to storage fails
    async fn append(
        &self,
        aggregate_id: TodoListId,
        events: Vec<DomainEvent>,
        expected_sequence: Option<u64>,
    ) -> StoreResult<u64>;

    /// Sequence of the last event in an aggregate's log
    ///
    /// Returns `None` if the aggregate has no events.
    async fn current_sequence(&self, aggregate_id: TodoListId) -> StoreResult<Option<u64>> {
        let events = self.fetch_by_aggregate(aggregate_id).await?;
        Ok(events.last().map(|e| e.sequence))
    }
}

/// Refuse batches that span aggregates
pub(crate) fn check_batch(aggregate_id: TodoListId, events: &[DomainEvent]) -> StoreResult<()> {
    match events.iter().find(|e| e.aggregate_id != aggregate_id) {
        Some(foreign) => Err(StoreError::AggregateMismatch {
            expected: aggregate_id,
            found: foreign.aggregate_id,
        }),
        None => Ok(()),
    }
}

/// Compare the caller's expected sequence with the log's current one
pub(crate) fn check_expected(
    aggregate_id: TodoListId,
    expected: Option<u64>,
    actual: u64,
) -> StoreResult<()> {
    match expected {
        Some(expected) if expected != actual => Err(StoreError::Conflict {
            aggregate_id,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}
