// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Service Layer
//!
//! Runs the synchronization protocol: one cycle per user command.
//!
//! ```text
//! Fetching  → fetch_by_aggregate(list_id)
//! Replaying → TodoList::replay (brand-new aggregate, nothing cached)
//! Appending → command on the fresh aggregate, append its uncommitted events
//!             (skipped when the command was a no-op)
//! Notifying → fetch + replay again, hand the result to the ViewRenderer
//! ```
//!
//! # Failure Semantics
//!
//! Any failure ends the cycle and is returned to the caller; nothing is
//! retried here. A store failure while Notifying after a successful append
//! is reported as [`ServiceError::Refresh`]: the events are already durable
//! and re-running the command would apply it twice. After a no-op command it
//! is a plain [`ServiceError::Store`] in the Notifying phase.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, field, info, info_span, warn, Instrument};

use super::view::ViewRenderer;
use crate::aggregate::{CommandError, ReplayError, TodoList, TodoListCommand};
use crate::config::{ConsistencyMode, ServiceConfig};
use crate::domain::{Clock, IdGenerator, SystemClock, TodoId, TodoListId, UuidV7Generator};
use crate::errors::StoreError;
use crate::event_store::EventStore;

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Step of a synchronization cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Fetching,
    Replaying,
    Appending,
    Notifying,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncPhase::Fetching => "fetching",
            SyncPhase::Replaying => "replaying",
            SyncPhase::Appending => "appending",
            SyncPhase::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

/// Service layer errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Command rejected by the aggregate; nothing was appended
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// The list's log cannot be replayed
    #[error(transparent)]
    Replay(#[from] ReplayError),

    /// Event store failed during the named phase
    #[error("Event store error while {phase}: {source}")]
    Store {
        phase: SyncPhase,
        #[source]
        source: StoreError,
    },

    /// Log moved on between fetch and append (expected-sequence mode only)
    #[error("Concurrency conflict on {aggregate_id}: expected sequence {expected}, log is at {actual}")]
    Conflict {
        aggregate_id: TodoListId,
        expected: u64,
        actual: u64,
    },

    /// Events were appended but the view could not be rebuilt
    #[error("Events stored, view refresh failed: {0}")]
    Refresh(#[source] RefreshError),
}

impl ServiceError {
    /// Phase the cycle stopped in
    pub fn phase(&self) -> SyncPhase {
        match self {
            ServiceError::Command(_) | ServiceError::Conflict { .. } => SyncPhase::Appending,
            ServiceError::Replay(_) => SyncPhase::Replaying,
            ServiceError::Store { phase, .. } => *phase,
            ServiceError::Refresh(_) => SyncPhase::Notifying,
        }
    }

    /// Whether re-running the whole cycle may succeed
    ///
    /// `Refresh` is excluded: the command already took effect.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Conflict { .. } => true,
            ServiceError::Store { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Failure rebuilding the view after a successful append
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

impl RefreshError {
    /// Report a refresh that followed no append as a plain Notifying failure
    fn into_unrefreshed(self) -> ServiceError {
        match self {
            RefreshError::Store(source) => ServiceError::Store {
                phase: SyncPhase::Notifying,
                source,
            },
            RefreshError::Replay(e) => ServiceError::Replay(e),
        }
    }
}

/// Result of one completed cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome<T> {
    /// What the command returned
    pub value: T,

    /// Number of events appended (0 for a no-op)
    pub appended: usize,

    /// Version of the log the view was rendered from
    pub version: u64,
}

/// TodoList service trait
///
/// The narrow interface a UI layer drives.
#[async_trait]
pub trait TodoListService: Send + Sync {
    /// Mint a new list id
    ///
    /// Nothing is written: an empty log is a valid empty list.
    async fn create_list(&self) -> ServiceResult<TodoListId>;

    /// Fetch and replay a list
    async fn load(&self, list_id: TodoListId) -> ServiceResult<TodoList>;

    /// Fetch, replay and render a list without running a command
    async fn refresh(&self, list_id: TodoListId) -> ServiceResult<TodoList>;

    /// Run one full synchronization cycle for a command
    ///
    /// Returns the id of the created item for `Add`.
    async fn execute(
        &self,
        list_id: TodoListId,
        command: TodoListCommand,
    ) -> ServiceResult<CommandOutcome<Option<TodoId>>>;
}

/// Event-sourced implementation of [`TodoListService`]
///
/// Holds no aggregate between cycles; every command starts from the store.
pub struct EventSourcedTodoListService<S: EventStore + ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    renderer: Arc<dyn ViewRenderer>,
    config: ServiceConfig,
}

impl<S: EventStore + ?Sized> EventSourcedTodoListService<S> {
    /// Create a service with the system clock and UUID v7 ids
    pub fn new(store: Arc<S>, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidV7Generator),
            renderer,
            config: ServiceConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    /// Run one synchronization cycle with an arbitrary command closure
    ///
    /// The closure runs against a freshly replayed aggregate; whatever it
    /// leaves in the uncommitted buffer is appended as one batch.
    pub async fn execute_with<T, F>(
        &self,
        list_id: TodoListId,
        command_name: &'static str,
        command: F,
    ) -> ServiceResult<CommandOutcome<T>>
    where
        T: Send,
        F: FnOnce(&mut TodoList) -> Result<T, CommandError> + Send,
    {
        let span = info_span!("sync_cycle", list_id = %list_id, command = command_name);
        self.run_cycle(list_id, command).instrument(span).await
    }

    async fn run_cycle<T, F>(&self, list_id: TodoListId, command: F) -> ServiceResult<CommandOutcome<T>>
    where
        T: Send,
        F: FnOnce(&mut TodoList) -> Result<T, CommandError> + Send,
    {
        let mut list = self.fetch_and_replay(list_id).await?;

        debug!("Phase: {}", SyncPhase::Appending);
        let value = command(&mut list).map_err(|e| {
            warn!("Command rejected: {}", e);
            ServiceError::Command(e)
        })?;

        let events = list.take_uncommitted_events();
        let appended = events.len();
        for event in &events {
            debug!("Recorded {}", event.event_type());
        }

        if events.is_empty() {
            debug!("Command was a no-op, skipping append");
        } else {
            let expected = match self.config.consistency {
                ConsistencyMode::Optimistic => None,
                ConsistencyMode::ExpectedSequence => Some(list.version()),
            };

            let last = self
                .store
                .append(list_id, events, expected)
                .await
                .map_err(|e| {
                    warn!("Append failed: {}", e);
                    match e {
                        StoreError::Conflict {
                            aggregate_id,
                            expected,
                            actual,
                        } => ServiceError::Conflict {
                            aggregate_id,
                            expected,
                            actual,
                        },
                        source => ServiceError::Store {
                            phase: SyncPhase::Appending,
                            source,
                        },
                    }
                })?;

            info!("Appended {} events to {} (sequence now {})", appended, list_id, last);
        }

        let fresh = self.notify(list_id).await.map_err(|e| {
            warn!("View refresh failed: {}", e);
            if appended == 0 {
                e.into_unrefreshed()
            } else {
                ServiceError::Refresh(e)
            }
        })?;

        Ok(CommandOutcome {
            value,
            appended,
            version: fresh.version(),
        })
    }

    async fn fetch_and_replay(&self, list_id: TodoListId) -> ServiceResult<TodoList> {
        debug!("Phase: {}", SyncPhase::Fetching);
        let log = self.store.fetch_by_aggregate(list_id).await.map_err(|source| {
            warn!("Fetch failed: {}", source);
            ServiceError::Store {
                phase: SyncPhase::Fetching,
                source,
            }
        })?;

        debug!("Phase: {} ({} events)", SyncPhase::Replaying, log.len());
        TodoList::replay(list_id, &log).map_err(|e| {
            warn!("Replay failed: {}", e);
            ServiceError::Replay(e)
        })
    }

    async fn notify(&self, list_id: TodoListId) -> Result<TodoList, RefreshError> {
        debug!("Phase: {}", SyncPhase::Notifying);
        let log = self.store.fetch_by_aggregate(list_id).await?;
        let fresh = TodoList::replay(list_id, &log)?;
        self.renderer.render(&fresh).await;
        Ok(fresh)
    }
}

#[async_trait]
impl<S: EventStore + ?Sized> TodoListService for EventSourcedTodoListService<S> {
    async fn create_list(&self) -> ServiceResult<TodoListId> {
        let list_id = self.ids.next_list_id();
        info!("Created todo list {}", list_id);
        Ok(list_id)
    }

    async fn load(&self, list_id: TodoListId) -> ServiceResult<TodoList> {
        self.fetch_and_replay(list_id).await
    }

    async fn refresh(&self, list_id: TodoListId) -> ServiceResult<TodoList> {
        self.notify(list_id).await.map_err(RefreshError::into_unrefreshed)
    }

    async fn execute(
        &self,
        list_id: TodoListId,
        command: TodoListCommand,
    ) -> ServiceResult<CommandOutcome<Option<TodoId>>> {
        let clock = Arc::clone(&self.clock);
        let ids = Arc::clone(&self.ids);

        let span = info_span!(
            "sync_cycle",
            list_id = %list_id,
            command = command.name(),
            todo_id = field::Empty,
        );
        if let Some(todo_id) = command.target() {
            span.record("todo_id", field::display(todo_id));
        }

        self.run_cycle(list_id, move |list| list.handle(command, clock.as_ref(), ids.as_ref()))
            .instrument(span)
            .await
    }
}
