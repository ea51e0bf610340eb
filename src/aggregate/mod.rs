// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Aggregate
//!
//! This module provides the event-sourced TodoList aggregate:
//! - State reconstruction by folding stored events: `[StoredEvent] → TodoList`
//! - Commands as methods that validate and emit events into an uncommitted buffer
//! - No I/O: the aggregate never talks to a store
//!
//! # Event Sourcing Pattern
//!
//! ```text
//! Command → TodoList → uncommitted DomainEvents → Event Store
//!    ↓          ↓                ↓
//! Intent   Validation          Facts
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use cim_todolist::aggregate::TodoList;
//! use cim_todolist::domain::{TodoId, TodoListId};
//! use uuid::Uuid;
//!
//! let list_id = TodoListId::from_uuid(Uuid::now_v7());
//! let mut list = TodoList::replay(list_id, &[]).unwrap();
//!
//! let milk = list.add(TodoId::from_uuid(Uuid::now_v7()), "Buy milk").unwrap();
//! list.change_position(milk, -1).unwrap(); // already first: no event
//!
//! assert_eq!(list.todos().len(), 1);
//! assert_eq!(list.uncommitted_events().len(), 1);
//! ```
//!
//! # Design Principles
//!
//! ## 1. Command-Event Separation
//! - Commands express intent and can fail
//! - Events express facts and cannot
//!
//! ## 2. Disposable Projection
//! - A fresh aggregate is replayed for every command
//! - Nothing is cached between commands
//!
//! ## 3. Time and Ids as Parameters
//! - Completion time and new item ids are passed in
//! - Replay is a pure function of the log

pub mod commands;
pub mod handlers;
pub mod todo_list;

pub use commands::{CommandError, TodoListCommand};
pub use todo_list::{Corruption, Partition, ReplayError, TodoList};
