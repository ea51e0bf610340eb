// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourced todo lists
//!
//! This crate provides the TodoList aggregate, the event store contract with
//! in-memory and NATS JetStream implementations, and the synchronization
//! service that runs one fetch/replay/append/notify cycle per user command.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod errors;
pub mod event_store;
pub mod events;
#[cfg(feature = "nats")]
pub mod jetstream;
pub mod service;

// Re-export commonly used types
pub use aggregate::{CommandError, ReplayError, TodoList, TodoListCommand};
pub use errors::{StoreError, StoreResult};
pub use event_store::{EventStore, InMemoryEventStore};
pub use service::{EventSourcedTodoListService, ServiceError, TodoListService, ViewRenderer};
