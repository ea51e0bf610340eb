// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Domain Events
//!
//! All state changes to a TodoList aggregate are represented as one of six
//! immutable, past-tense facts. The set is closed: the aggregate folds them
//! with an exhaustive `match`, so adding a variant forces every consumer to
//! handle it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{TodoId, TodoName};

/// TodoList Domain Events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TodoListEvent {
    /// New incomplete item appended at the tail of the incomplete partition
    TodoAdded {
        todo_id: TodoId,
        name: TodoName,
        /// Rank the item received when it was added (informational on replay)
        position: usize,
    },

    /// Item display name replaced
    TodoRenamed { todo_id: TodoId, name: TodoName },

    /// Item moved to the tail of the completed partition
    TodoCompleted {
        todo_id: TodoId,
        completed_at: DateTime<Utc>,
    },

    /// Item moved back to the tail of the incomplete partition
    TodoUncompleted { todo_id: TodoId },

    /// Item swapped rank with its neighbour inside its partition
    TodoMoved { todo_id: TodoId, delta: MoveDelta },

    /// Item permanently removed; its id is retired
    TodoRemoved { todo_id: TodoId },
}

impl TodoListEvent {
    /// Every event type name this aggregate understands
    pub const TYPE_NAMES: [&'static str; 6] = [
        "TodoAdded",
        "TodoRenamed",
        "TodoCompleted",
        "TodoUncompleted",
        "TodoMoved",
        "TodoRemoved",
    ];

    /// Stable type name, identical to the serialized `type` tag
    pub fn event_type_name(&self) -> &'static str {
        match self {
            TodoListEvent::TodoAdded { .. } => "TodoAdded",
            TodoListEvent::TodoRenamed { .. } => "TodoRenamed",
            TodoListEvent::TodoCompleted { .. } => "TodoCompleted",
            TodoListEvent::TodoUncompleted { .. } => "TodoUncompleted",
            TodoListEvent::TodoMoved { .. } => "TodoMoved",
            TodoListEvent::TodoRemoved { .. } => "TodoRemoved",
        }
    }

    /// Whether `name` belongs to the closed type table
    pub fn is_known_type(name: &str) -> bool {
        Self::TYPE_NAMES.contains(&name)
    }

    /// The item this event is about
    pub fn todo_id(&self) -> TodoId {
        match self {
            TodoListEvent::TodoAdded { todo_id, .. }
            | TodoListEvent::TodoRenamed { todo_id, .. }
            | TodoListEvent::TodoCompleted { todo_id, .. }
            | TodoListEvent::TodoUncompleted { todo_id }
            | TodoListEvent::TodoMoved { todo_id, .. }
            | TodoListEvent::TodoRemoved { todo_id } => *todo_id,
        }
    }

    /// Producer-supplied timestamp, if this event semantically carries one
    pub fn intrinsic_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            TodoListEvent::TodoCompleted { completed_at, .. } => Some(*completed_at),
            _ => None,
        }
    }
}

/// Direction of a single-step move; serialized as `-1` or `+1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum MoveDelta {
    /// Towards the head of the partition (-1)
    Up,
    /// Towards the tail of the partition (+1)
    Down,
}

impl MoveDelta {
    /// Parse a raw delta; anything other than -1 or +1 is rejected
    pub fn from_delta(delta: i64) -> Option<Self> {
        match delta {
            -1 => Some(MoveDelta::Up),
            1 => Some(MoveDelta::Down),
            _ => None,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            MoveDelta::Up => -1,
            MoveDelta::Down => 1,
        }
    }

    /// Index of the neighbour to swap with, or `None` at a partition boundary
    pub fn target_index(self, index: usize, len: usize) -> Option<usize> {
        match self {
            MoveDelta::Up => index.checked_sub(1),
            MoveDelta::Down => index.checked_add(1).filter(|&next| next < len),
        }
    }
}

impl TryFrom<i8> for MoveDelta {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        MoveDelta::from_delta(i64::from(value))
            .ok_or_else(|| format!("move delta must be -1 or +1, got {value}"))
    }
}

impl From<MoveDelta> for i8 {
    fn from(delta: MoveDelta) -> Self {
        delta.as_i8()
    }
}

impl fmt::Display for MoveDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.as_i8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn todo_id() -> TodoId {
        TodoId::from_uuid(Uuid::from_u128(1))
    }

    #[test]
    fn test_type_tag_matches_type_name() {
        let event = TodoListEvent::TodoMoved {
            todo_id: todo_id(),
            delta: MoveDelta::Up,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "TodoMoved");
        assert_eq!(value["delta"], -1);
        assert_eq!(event.event_type_name(), "TodoMoved");
    }

    #[test]
    fn test_every_variant_name_is_known() {
        let name = TodoName::new("A").unwrap();
        let events = [
            TodoListEvent::TodoAdded { todo_id: todo_id(), name: name.clone(), position: 0 },
            TodoListEvent::TodoRenamed { todo_id: todo_id(), name },
            TodoListEvent::TodoCompleted { todo_id: todo_id(), completed_at: Utc::now() },
            TodoListEvent::TodoUncompleted { todo_id: todo_id() },
            TodoListEvent::TodoMoved { todo_id: todo_id(), delta: MoveDelta::Down },
            TodoListEvent::TodoRemoved { todo_id: todo_id() },
        ];
        for event in &events {
            assert!(TodoListEvent::is_known_type(event.event_type_name()));
        }
        assert!(!TodoListEvent::is_known_type("TodoArchived"));
    }

    #[test]
    fn test_move_delta_rejects_other_values() {
        assert!(serde_json::from_str::<MoveDelta>("2").is_err());
        assert!(serde_json::from_str::<MoveDelta>("0").is_err());
        assert_eq!(serde_json::from_str::<MoveDelta>("1").unwrap(), MoveDelta::Down);
        assert_eq!(MoveDelta::from_delta(-1), Some(MoveDelta::Up));
        assert_eq!(MoveDelta::from_delta(3), None);
    }

    #[test]
    fn test_target_index_clamps_at_boundaries() {
        assert_eq!(MoveDelta::Up.target_index(0, 3), None);
        assert_eq!(MoveDelta::Down.target_index(2, 3), None);
        assert_eq!(MoveDelta::Up.target_index(2, 3), Some(1));
        assert_eq!(MoveDelta::Down.target_index(0, 3), Some(1));
    }

    #[test]
    fn test_only_completion_carries_timestamp() {
        let at = Utc::now();
        let completed = TodoListEvent::TodoCompleted { todo_id: todo_id(), completed_at: at };
        assert_eq!(completed.intrinsic_timestamp(), Some(at));
        assert_eq!(TodoListEvent::TodoRemoved { todo_id: todo_id() }.intrinsic_timestamp(), None);
    }
}
