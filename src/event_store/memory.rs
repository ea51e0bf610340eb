// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Event Store
//!
//! Process-local implementation of [`EventStore`] for tests and the terminal
//! driver. A single `RwLock` guards all logs; holding the write lock across
//! sequence assignment and insertion makes each append atomic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{check_batch, check_expected, EventStore};
use crate::domain::{Clock, SystemClock, TodoListId};
use crate::errors::{StoreError, StoreResult};
use crate::events::{DomainEvent, StoredEvent};

/// Event store holding every log in memory
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<TodoListId, Vec<StoredEvent>>>,

    /// Assigns `occurred_at` when the producer did not
    clock: Arc<dyn Clock>,

    /// When false every call fails with `Unavailable`
    available: AtomicBool,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
            clock,
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the medium going away (or coming back)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Push raw records onto a log, bypassing sequence assignment
    ///
    /// Used to stage logs written by other producers, including damaged ones.
    pub async fn import_raw(&self, aggregate_id: TodoListId, records: Vec<StoredEvent>) {
        let mut streams = self.streams.write().await;
        streams.entry(aggregate_id).or_default().extend(records);
    }

    /// Number of aggregates with at least one event
    pub async fn aggregate_count(&self) -> usize {
        self.streams.read().await.len()
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store switched off".to_string()))
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn fetch_by_aggregate(&self, aggregate_id: TodoListId) -> StoreResult<Vec<StoredEvent>> {
        self.ensure_available()?;

        let streams = self.streams.read().await;
        Ok(streams.get(&aggregate_id).cloned().unwrap_or_default())
    }

    async fn append(
        &self,
        aggregate_id: TodoListId,
        events: Vec<DomainEvent>,
        expected_sequence: Option<u64>,
    ) -> StoreResult<u64> {
        self.ensure_available()?;
        check_batch(aggregate_id, &events)?;

        let mut streams = self.streams.write().await;
        let current = streams
            .get(&aggregate_id)
            .and_then(|log| log.last())
            .map(|e| e.sequence)
            .unwrap_or(0);

        check_expected(aggregate_id, expected_sequence, current)?;

        if events.is_empty() {
            return Ok(current);
        }

        // Encode the whole batch before touching the log
        let recorded_at = self.clock.now();
        let count = events.len();
        let records = events
            .into_iter()
            .zip(current + 1..)
            .map(|(event, sequence)| event.into_stored(sequence, recorded_at))
            .collect::<StoreResult<Vec<_>>>()?;

        let last = current + count as u64;
        streams.entry(aggregate_id).or_default().extend(records);

        debug!("Appended {} events to {} (sequence now {})", count, aggregate_id, last);
        Ok(last)
    }

    async fn current_sequence(&self, aggregate_id: TodoListId) -> StoreResult<Option<u64>> {
        self.ensure_available()?;

        let streams = self.streams.read().await;
        Ok(streams
            .get(&aggregate_id)
            .and_then(|log| log.last())
            .map(|e| e.sequence))
    }
}
