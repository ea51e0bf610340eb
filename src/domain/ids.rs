// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identifier Value Objects and Id Generation
//!
//! Todo items and todo lists are identified by opaque UUIDs. The newtypes keep
//! the two id spaces from being mixed up at compile time, and the
//! [`IdGenerator`] trait lets the application layer inject id creation so
//! that tests and replays stay deterministic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Identifier of a single todo item, immutable for the item's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

/// Identifier of a todo list aggregate (the event stream key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoListId(Uuid);

macro_rules! uuid_newtype {
    ($name:ident) => {
        impl $name {
            /// Wrap an existing UUID
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Underlying UUID
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_newtype!(TodoId);
uuid_newtype!(TodoListId);

/// Source of fresh identifiers for new todo items and new lists
pub trait IdGenerator: Send + Sync {
    /// Produce a UUID that has never been handed out before
    fn next_uuid(&self) -> Uuid;

    /// Fresh todo item id
    fn next_todo_id(&self) -> TodoId {
        TodoId(self.next_uuid())
    }

    /// Fresh todo list id
    fn next_list_id(&self) -> TodoListId {
        TodoListId(self.next_uuid())
    }
}

/// Production generator: time-ordered UUID v7
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_uuid(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Deterministic generator handing out `1, 2, 3, ...` as UUIDs
///
/// ```rust
/// use cim_todolist::domain::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new();
/// assert_eq!(ids.next_uuid().as_u128(), 1);
/// assert_eq!(ids.next_uuid().as_u128(), 2);
/// ```
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// First id handed out will be `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: AtomicU64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_uuid(&self) -> Uuid {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Uuid::from_u128(u128::from(n))
    }
}
