// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Domain Models
//!
//! Value objects and injected collaborators shared by events, the aggregate
//! and the service layer.
//!
//! # Value Objects with Invariants
//!
//! - [`TodoId`] / [`TodoListId`] - opaque UUID identifiers
//! - [`TodoName`] - trimmed, non-empty display name
//! - [`Todo`] - item view with derived partition position
//!
//! # Injected Collaborators
//!
//! - [`Clock`] - wall-clock time source
//! - [`IdGenerator`] - fresh ids for items and lists

pub mod clock;
pub mod ids;
pub mod todo;
pub mod todo_name;

pub use clock::{Clock, FixedClock, SystemClock};
pub use ids::{IdGenerator, SequentialIdGenerator, TodoId, TodoListId, UuidV7Generator};
pub use todo::Todo;
pub use todo_name::{TodoName, TodoNameError};
