// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Domain Events
//!
//! Events are immutable facts representing state changes that have occurred.
//!
//! # Event Sourcing Principles
//!
//! 1. **Events are immutable**: once appended, never updated or deleted
//! 2. **Events are past tense**: `TodoAdded`, not `AddTodo`
//! 3. **Events are ordered**: `sequence` is gapless per aggregate
//! 4. **The log is the truth**: no other mutable state exists
//!
//! # Event Flow
//!
//! ```text
//! Command → TodoList → DomainEvent → EventStore → StoredEvent → Replay
//! ```
//!
//! # Module Organization
//!
//! - [`todo_list`] - the closed set of TodoList events
//! - [`envelope`] - uncommitted and persisted envelopes

pub mod envelope;
pub mod todo_list;

pub use envelope::{DecodeError, DomainEvent, StoredEvent};
pub use todo_list::{MoveDelta, TodoListEvent};
