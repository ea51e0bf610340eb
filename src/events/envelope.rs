// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Envelopes
//!
//! Two shapes travel across the store boundary:
//!
//! ```text
//! TodoList command → DomainEvent (no sequence yet) → EventStore::append
//! EventStore::fetch_by_aggregate → StoredEvent (sequence, raw payload) → replay
//! ```
//!
//! A [`StoredEvent`] keeps its payload as raw JSON keyed by `event_type`, so a
//! record written by a newer producer (or damaged in storage) is detected
//! when it is decoded during replay instead of being dropped by a transport
//! layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::todo_list::TodoListEvent;
use crate::domain::TodoListId;
use crate::errors::StoreResult;

/// Event produced by a command and not yet appended to a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Aggregate this fact belongs to
    pub aggregate_id: TodoListId,

    /// Producer-supplied timestamp; `None` lets the store assign one
    pub occurred_at: Option<DateTime<Utc>>,

    /// The fact itself
    pub event: TodoListEvent,
}

impl DomainEvent {
    /// Wrap an event, taking `occurred_at` from the event when it carries one
    pub fn new(aggregate_id: TodoListId, event: TodoListEvent) -> Self {
        Self {
            aggregate_id,
            occurred_at: event.intrinsic_timestamp(),
            event,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.event.event_type_name()
    }

    /// Turn into a persisted record with its assigned `sequence`
    ///
    /// `recorded_at` is used when the producer did not supply a timestamp.
    pub fn into_stored(self, sequence: u64, recorded_at: DateTime<Utc>) -> StoreResult<StoredEvent> {
        let payload = serde_json::to_value(&self.event)?;
        Ok(StoredEvent {
            aggregate_id: self.aggregate_id,
            sequence,
            occurred_at: self.occurred_at.unwrap_or(recorded_at),
            event_type: self.event.event_type_name().to_string(),
            payload,
        })
    }
}

/// Persisted event record, keyed by `aggregate_id` + `sequence`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Aggregate this record belongs to
    pub aggregate_id: TodoListId,

    /// Position in the aggregate's log, starting at 1, gapless
    pub sequence: u64,

    /// When the fact happened (producer- or store-assigned)
    pub occurred_at: DateTime<Utc>,

    /// Type name used to select the decoder
    pub event_type: String,

    /// Serialized [`TodoListEvent`]
    pub payload: serde_json::Value,
}

/// Why a stored record could not be turned back into a [`TodoListEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown event type {0:?}")]
    UnknownEventType(String),

    #[error("payload of {event_type} does not decode: {message}")]
    InvalidPayload { event_type: String, message: String },

    #[error("record typed {declared} carries a {actual} payload")]
    TypeMismatch {
        declared: String,
        actual: &'static str,
    },
}

impl StoredEvent {
    /// Decode the payload against the closed event type table
    pub fn decode(&self) -> Result<TodoListEvent, DecodeError> {
        if !TodoListEvent::is_known_type(&self.event_type) {
            return Err(DecodeError::UnknownEventType(self.event_type.clone()));
        }

        let event: TodoListEvent =
            serde_json::from_value(self.payload.clone()).map_err(|e| DecodeError::InvalidPayload {
                event_type: self.event_type.clone(),
                message: e.to_string(),
            })?;

        if event.event_type_name() != self.event_type {
            return Err(DecodeError::TypeMismatch {
                declared: self.event_type.clone(),
                actual: event.event_type_name(),
            });
        }

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TodoId, TodoName};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn list_id() -> TodoListId {
        TodoListId::from_uuid(Uuid::from_u128(100))
    }

    fn added() -> TodoListEvent {
        TodoListEvent::TodoAdded {
            todo_id: TodoId::from_uuid(Uuid::from_u128(1)),
            name: TodoName::new("A").unwrap(),
            position: 0,
        }
    }

    #[test]
    fn test_event_type_names_the_variant() {
        assert_eq!(DomainEvent::new(list_id(), added()).event_type(), "TodoAdded");
    }

    #[test]
    fn test_store_assigns_timestamp_when_producer_did_not() {
        let recorded_at = Utc.timestamp_millis_opt(5_000).unwrap();
        let stored = DomainEvent::new(list_id(), added()).into_stored(1, recorded_at).unwrap();

        assert_eq!(stored.occurred_at, recorded_at);
        assert_eq!(stored.event_type, "TodoAdded");
        assert_eq!(stored.decode().unwrap(), added());
    }

    #[test]
    fn test_completion_time_is_kept() {
        let completed_at = Utc.timestamp_millis_opt(100).unwrap();
        let event = TodoListEvent::TodoCompleted {
            todo_id: TodoId::from_uuid(Uuid::from_u128(1)),
            completed_at,
        };
        let stored = DomainEvent::new(list_id(), event)
            .into_stored(2, Utc.timestamp_millis_opt(9_999).unwrap())
            .unwrap();

        assert_eq!(stored.occurred_at, completed_at);
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let mut stored = DomainEvent::new(list_id(), added())
            .into_stored(1, Utc::now())
            .unwrap();
        stored.event_type = "TodoArchived".to_string();

        assert_eq!(
            stored.decode(),
            Err(DecodeError::UnknownEventType("TodoArchived".to_string()))
        );
    }

    #[test]
    fn test_type_disagreeing_with_payload_is_reported() {
        let mut stored = DomainEvent::new(list_id(), added())
            .into_stored(1, Utc::now())
            .unwrap();
        stored.event_type = "TodoRemoved".to_string();

        assert!(matches!(stored.decode(), Err(DecodeError::TypeMismatch { .. })));
    }

    #[test]
    fn test_invalid_payload_is_reported() {
        let stored = StoredEvent {
            aggregate_id: list_id(),
            sequence: 1,
            occurred_at: Utc::now(),
            event_type: "TodoMoved".to_string(),
            payload: serde_json::json!({
                "type": "TodoMoved",
                "todo_id": Uuid::from_u128(1),
                "delta": 2,
            }),
        };

        assert!(matches!(stored.decode(), Err(DecodeError::InvalidPayload { .. })));
    }
}
