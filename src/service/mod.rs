// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for TodoLists
//!
//! This module provides the application service layer that orchestrates
//! the aggregate, the event store and the rendering collaborator.
//!
//! # Architecture
//!
//! ```text
//! UI action
//!     ↓
//! Service Layer (this module)
//!     ↓
//! Fetch → Replay → Command → Append
//!     ↓
//! Event Store (in-memory or NATS JetStream)
//!     ↓
//! Fresh replay → ViewRenderer
//! ```
//!
//! # Design Principles
//!
//! 1. **Refetch per Command**: no aggregate is reused between commands
//! 2. **No Auto-Retry**: failures are surfaced; retry policy belongs to the caller
//! 3. **Injected Time and Ids**: the service owns the `Clock` and `IdGenerator`
//! 4. **Async by Default**: all I/O is asynchronous
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cim_todolist::aggregate::TodoListCommand;
//! use cim_todolist::event_store::InMemoryEventStore;
//! use cim_todolist::service::{EventSourcedTodoListService, NullRenderer, TodoListService};
//!
//! # tokio_test::block_on(async {
//! let service = EventSourcedTodoListService::new(
//!     Arc::new(InMemoryEventStore::new()),
//!     Arc::new(NullRenderer),
//! );
//!
//! let list_id = service.create_list().await.unwrap();
//! let outcome = service
//!     .execute(list_id, TodoListCommand::Add { name: "Buy milk".into() })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(outcome.appended, 1);
//! # });
//! ```

pub mod todo_list;
pub mod view;

pub use todo_list::{
    CommandOutcome, EventSourcedTodoListService, RefreshError, ServiceError, ServiceResult,
    SyncPhase, TodoListService,
};
pub use view::{NullRenderer, ViewRenderer};
