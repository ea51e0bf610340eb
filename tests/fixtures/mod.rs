// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-todolist
//!
//! Provides deterministic test data for aggregate, store and service tests.
//! All UUIDs and timestamps are fixed constants to ensure tests are reproducible.
//!
//! # Design Principles
//! - All test data is deterministic (no `Uuid::now_v7()` or `Utc::now()`)
//! - Item ids are small integers so assertions stay readable

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use cim_todolist::domain::{TodoId, TodoListId, TodoName};
use cim_todolist::events::{DomainEvent, MoveDelta, StoredEvent, TodoListEvent};

pub const LIST_ID_1: &str = "01934f4a-1000-7000-8000-000000001000";
pub const LIST_ID_2: &str = "01934f4a-2000-7000-8000-000000002000";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

pub fn list_id() -> TodoListId {
    TodoListId::from_uuid(parse_uuid(LIST_ID_1))
}

pub fn other_list_id() -> TodoListId {
    TodoListId::from_uuid(parse_uuid(LIST_ID_2))
}

/// Item id `n`
pub fn todo_id(n: u128) -> TodoId {
    TodoId::from_uuid(Uuid::from_u128(n))
}

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// Timestamp `ms` milliseconds after the epoch
pub fn at_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().expect("Invalid millis in test fixture")
}

pub fn added(n: u128, name: &str) -> TodoListEvent {
    TodoListEvent::TodoAdded {
        todo_id: todo_id(n),
        name: TodoName::new(name).expect("Invalid name in test fixture"),
        position: 0,
    }
}

pub fn renamed(n: u128, name: &str) -> TodoListEvent {
    TodoListEvent::TodoRenamed {
        todo_id: todo_id(n),
        name: TodoName::new(name).expect("Invalid name in test fixture"),
    }
}

pub fn completed(n: u128, at: DateTime<Utc>) -> TodoListEvent {
    TodoListEvent::TodoCompleted {
        todo_id: todo_id(n),
        completed_at: at,
    }
}

pub fn uncompleted(n: u128) -> TodoListEvent {
    TodoListEvent::TodoUncompleted { todo_id: todo_id(n) }
}

pub fn moved(n: u128, delta: MoveDelta) -> TodoListEvent {
    TodoListEvent::TodoMoved {
        todo_id: todo_id(n),
        delta,
    }
}

pub fn removed(n: u128) -> TodoListEvent {
    TodoListEvent::TodoRemoved { todo_id: todo_id(n) }
}

/// Events for the fixture list, ready to append
pub fn domain_events(events: Vec<TodoListEvent>) -> Vec<DomainEvent> {
    events
        .into_iter()
        .map(|event| DomainEvent::new(list_id(), event))
        .collect()
}

/// A well-formed log for the fixture list, sequences from 1
pub fn stored_log(events: Vec<TodoListEvent>) -> Vec<StoredEvent> {
    domain_events(events)
        .into_iter()
        .zip(1u64..)
        .map(|(event, sequence)| {
            event
                .into_stored(sequence, fixed_timestamp())
                .expect("Fixture event must serialize")
        })
        .collect()
}

/// Display names of a partition, in order
pub fn names(items: &[cim_todolist::domain::Todo]) -> Vec<String> {
    items.iter().map(|t| t.name.to_string()).collect()
}

/// Positions of a partition, in order
pub fn positions(items: &[cim_todolist::domain::Todo]) -> Vec<usize> {
    items.iter().map(|t| t.position).collect()
}
