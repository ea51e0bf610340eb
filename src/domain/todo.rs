// Copyright (c) 2025 - Cowboy AI, Inc.
//! Todo Item Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::TodoId;
use super::todo_name::TodoName;

/// A single item of a todo list as seen by renderers
///
/// `position` is the zero-based rank within the item's partition (incomplete
/// or completed). It is derived from partition order and rewritten by the
/// aggregate after every change, so it is always contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub name: TodoName,
    pub completed_at: Option<DateTime<Utc>>,
    pub position: usize,
}

impl Todo {
    pub(crate) fn new(id: TodoId, name: TodoName) -> Self {
        Self {
            id,
            name,
            completed_at: None,
            position: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
