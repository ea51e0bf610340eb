// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Commands
//!
//! Commands express user intent and can be rejected; events record what
//! happened and cannot. [`TodoListCommand`] is the narrow interface a UI
//! layer drives: one variant per user action.
//!
//! # Time and Identity
//!
//! Commands carry no timestamps or fresh ids. The service layer draws those
//! from the injected [`Clock`](crate::domain::Clock) and
//! [`IdGenerator`](crate::domain::IdGenerator) when it executes a command.

use thiserror::Error;

use crate::domain::{TodoId, TodoNameError};

/// Command rejected by the aggregate; nothing was emitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Bad command argument value (blank name)
    #[error("Validation error: {0}")]
    Validation(#[from] TodoNameError),

    /// Target item is not live in this list
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// Malformed command shape (delta other than -1/+1, reused id)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A single user action against a todo list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoListCommand {
    Add { name: String },
    Rename { todo_id: TodoId, name: String },
    Complete { todo_id: TodoId },
    Uncomplete { todo_id: TodoId },
    MoveUp { todo_id: TodoId },
    MoveDown { todo_id: TodoId },
    ChangePosition { todo_id: TodoId, delta: i64 },
    Remove { todo_id: TodoId },
}

impl TodoListCommand {
    /// Short name for logs and spans
    pub fn name(&self) -> &'static str {
        match self {
            TodoListCommand::Add { .. } => "add",
            TodoListCommand::Rename { .. } => "rename",
            TodoListCommand::Complete { .. } => "complete",
            TodoListCommand::Uncomplete { .. } => "uncomplete",
            TodoListCommand::MoveUp { .. } => "move_up",
            TodoListCommand::MoveDown { .. } => "move_down",
            TodoListCommand::ChangePosition { .. } => "change_position",
            TodoListCommand::Remove { .. } => "remove",
        }
    }

    /// Item the command targets; `None` for `Add`
    pub fn target(&self) -> Option<TodoId> {
        match self {
            TodoListCommand::Add { .. } => None,
            TodoListCommand::Rename { todo_id, .. }
            | TodoListCommand::Complete { todo_id }
            | TodoListCommand::Uncomplete { todo_id }
            | TodoListCommand::MoveUp { todo_id }
            | TodoListCommand::MoveDown { todo_id }
            | TodoListCommand::ChangePosition { todo_id, .. }
            | TodoListCommand::Remove { todo_id } => Some(*todo_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_command_error_display() {
        let id = TodoId::from_uuid(Uuid::from_u128(9));
        assert!(CommandError::NotFound(id).to_string().contains("not found"));
        assert_eq!(
            CommandError::from(TodoNameError::Empty).to_string(),
            "Validation error: Todo name is empty"
        );
    }

    #[test]
    fn test_target() {
        let id = TodoId::from_uuid(Uuid::from_u128(9));
        assert_eq!(TodoListCommand::Add { name: "x".into() }.target(), None);
        assert_eq!(TodoListCommand::MoveDown { todo_id: id }.target(), Some(id));
        assert_eq!(TodoListCommand::MoveDown { todo_id: id }.name(), "move_down");
    }
}
