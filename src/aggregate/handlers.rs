// Copyright (c) 2025 - Cowboy AI, Inc.
//! Command Handlers for the TodoList Aggregate
//!
//! Each handler validates against the current state and, on success, records
//! exactly one event: applied to the partitions right away and buffered in
//! `uncommitted_events` for the service layer to append.
//!
//! ```text
//! handle(&mut TodoList, args) → Ok(()) + 0..1 uncommitted events
//!                             → Err(CommandError), state untouched
//! ```
//!
//! # Business Rules
//!
//! - Names must be non-blank after trimming
//! - Completion and un-completion are idempotent (no event when already there)
//! - Moves are single steps inside the item's partition; a move past either
//!   end is clamped to a no-op
//! - Removed ids are retired and can never be added again

use chrono::{DateTime, Utc};

use super::commands::{CommandError, TodoListCommand};
use super::todo_list::{Partition, TodoList};
use crate::domain::{Clock, IdGenerator, TodoId, TodoName};
use crate::events::{MoveDelta, TodoListEvent};

impl TodoList {
    /// Add a new incomplete item at the tail
    ///
    /// `todo_id` must be fresh; the service layer takes it from its
    /// [`IdGenerator`].
    pub fn add(&mut self, todo_id: TodoId, name: &str) -> Result<TodoId, CommandError> {
        if self.contains(todo_id) || self.is_retired(todo_id) {
            return Err(CommandError::InvalidArgument(format!(
                "todo id {todo_id} is already in use"
            )));
        }

        let name = TodoName::new(name)?;
        let position = self.todos().len();
        self.record(TodoListEvent::TodoAdded {
            todo_id,
            name,
            position,
        });
        Ok(todo_id)
    }

    /// Replace an item's display name
    pub fn rename(&mut self, todo_id: TodoId, name: &str) -> Result<(), CommandError> {
        self.require_live(todo_id)?;
        let name = TodoName::new(name)?;

        self.record(TodoListEvent::TodoRenamed { todo_id, name });
        Ok(())
    }

    /// Mark an item completed at `completed_at`
    pub fn complete(&mut self, todo_id: TodoId, completed_at: DateTime<Utc>) -> Result<(), CommandError> {
        if self.require_live(todo_id)? == Partition::Completed {
            return Ok(());
        }

        self.record(TodoListEvent::TodoCompleted {
            todo_id,
            completed_at,
        });
        Ok(())
    }

    /// Return a completed item to the incomplete partition
    pub fn uncomplete(&mut self, todo_id: TodoId) -> Result<(), CommandError> {
        if self.require_live(todo_id)? == Partition::Incomplete {
            return Ok(());
        }

        self.record(TodoListEvent::TodoUncompleted { todo_id });
        Ok(())
    }

    /// Swap an item with its neighbour; `delta` must be -1 or +1
    pub fn change_position(&mut self, todo_id: TodoId, delta: i64) -> Result<(), CommandError> {
        let delta = MoveDelta::from_delta(delta).ok_or_else(|| {
            CommandError::InvalidArgument(format!("move delta must be -1 or +1, got {delta}"))
        })?;
        self.step(todo_id, delta)
    }

    /// Remove an item for good
    pub fn remove(&mut self, todo_id: TodoId) -> Result<(), CommandError> {
        self.require_live(todo_id)?;

        self.record(TodoListEvent::TodoRemoved { todo_id });
        Ok(())
    }

    /// Dispatch a UI command, drawing time and ids from the injected sources
    ///
    /// Returns the id of the created item for `Add`.
    pub fn handle(
        &mut self,
        command: TodoListCommand,
        clock: &dyn Clock,
        ids: &dyn IdGenerator,
    ) -> Result<Option<TodoId>, CommandError> {
        match command {
            TodoListCommand::Add { name } => self.add(ids.next_todo_id(), &name).map(Some),
            TodoListCommand::Rename { todo_id, name } => self.rename(todo_id, &name).map(|_| None),
            TodoListCommand::Complete { todo_id } => self.complete(todo_id, clock.now()).map(|_| None),
            TodoListCommand::Uncomplete { todo_id } => self.uncomplete(todo_id).map(|_| None),
            TodoListCommand::MoveUp { todo_id } => self.step(todo_id, MoveDelta::Up).map(|_| None),
            TodoListCommand::MoveDown { todo_id } => self.step(todo_id, MoveDelta::Down).map(|_| None),
            TodoListCommand::ChangePosition { todo_id, delta } => {
                self.change_position(todo_id, delta).map(|_| None)
            }
            TodoListCommand::Remove { todo_id } => self.remove(todo_id).map(|_| None),
        }
    }

    fn step(&mut self, todo_id: TodoId, delta: MoveDelta) -> Result<(), CommandError> {
        let partition = self.require_live(todo_id)?;
        let items = self.partition(partition);
        let index = items
            .iter()
            .position(|t| t.id == todo_id)
            .ok_or(CommandError::NotFound(todo_id))?;

        if delta.target_index(index, items.len()).is_none() {
            return Ok(());
        }

        self.record(TodoListEvent::TodoMoved { todo_id, delta });
        Ok(())
    }

    fn require_live(&self, todo_id: TodoId) -> Result<Partition, CommandError> {
        self.locate(todo_id)
            .map(|(partition, _)| partition)
            .ok_or(CommandError::NotFound(todo_id))
    }
}
