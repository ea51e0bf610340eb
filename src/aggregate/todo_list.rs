// Copyright (c) 2025 - Cowboy AI, Inc.
//! TodoList Aggregate
//!
//! The aggregate is a disposable projection of one list's event log:
//!
//! ```text
//! [StoredEvent] → replay() → TodoList { incomplete, completed }
//! TodoList + command → uncommitted DomainEvents (applied immediately)
//! ```
//!
//! # Replay
//!
//! Replay is a left fold from the empty list. It is strict about the log's
//! shape (aggregate id, gapless sequence, known event types, decodable
//! payloads) and fails with [`ReplayError::CorruptEventLog`] otherwise.
//!
//! It is lenient about content that two concurrent cycles can legitimately
//! produce from the same base (renaming a removed item, completing twice,
//! moving past a boundary that shifted underneath). Those events apply as
//! no-ops, so a raced log still loads and still folds deterministically.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Todo, TodoId, TodoListId};
use crate::events::{DecodeError, DomainEvent, StoredEvent, TodoListEvent};

/// Replay failure; fatal for the aggregate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("Corrupt event log for {aggregate_id} at sequence {sequence}: {reason}")]
    CorruptEventLog {
        aggregate_id: TodoListId,
        sequence: u64,
        reason: Corruption,
    },
}

/// What was wrong with a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Corruption {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("record belongs to aggregate {0}")]
    ForeignAggregate(TodoListId),

    #[error("expected sequence {expected}, found {found}")]
    OutOfSequence { expected: u64, found: u64 },
}

/// The two disjoint orderings an item can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Incomplete,
    Completed,
}

/// TodoList aggregate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoList {
    id: TodoListId,

    /// Sequence of the last stored event folded in (0 for an empty log)
    version: u64,

    incomplete: Vec<Todo>,
    completed: Vec<Todo>,

    /// Ids removed at some point; never live again
    retired: HashSet<TodoId>,

    /// Events produced by commands on this instance, oldest first
    uncommitted: Vec<DomainEvent>,
}

impl TodoList {
    /// Empty list with no history
    pub fn new(id: TodoListId) -> Self {
        Self {
            id,
            version: 0,
            incomplete: Vec::new(),
            completed: Vec::new(),
            retired: HashSet::new(),
            uncommitted: Vec::new(),
        }
    }

    /// Rebuild a list by folding its stored events in order
    ///
    /// # Errors
    ///
    /// [`ReplayError::CorruptEventLog`] if a record belongs to another
    /// aggregate, breaks the `1, 2, 3, ...` sequence, has an unknown type or
    /// does not decode. No partial state is returned.
    pub fn replay(id: TodoListId, events: &[StoredEvent]) -> Result<Self, ReplayError> {
        let mut list = Self::new(id);

        for record in events {
            let corrupt = |reason: Corruption| ReplayError::CorruptEventLog {
                aggregate_id: id,
                sequence: record.sequence,
                reason,
            };

            if record.aggregate_id != id {
                return Err(corrupt(Corruption::ForeignAggregate(record.aggregate_id)));
            }

            let expected = list.version + 1;
            if record.sequence != expected {
                return Err(corrupt(Corruption::OutOfSequence {
                    expected,
                    found: record.sequence,
                }));
            }

            let event = record.decode().map_err(|e| corrupt(e.into()))?;
            list.apply(&event);
            list.version = record.sequence;
        }

        debug!(
            "Replayed {} events for list {} ({} open, {} done)",
            events.len(),
            id,
            list.incomplete.len(),
            list.completed.len()
        );

        Ok(list)
    }

    pub fn id(&self) -> TodoListId {
        self.id
    }

    /// Last stored sequence this projection reflects
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Incomplete items in display order
    pub fn todos(&self) -> &[Todo] {
        &self.incomplete
    }

    /// Completed items in display order
    pub fn completed_todos(&self) -> &[Todo] {
        &self.completed
    }

    /// Events produced since construction and not yet appended
    pub fn uncommitted_events(&self) -> &[DomainEvent] {
        &self.uncommitted
    }

    /// Drain the uncommitted buffer for appending
    pub fn take_uncommitted_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.uncommitted)
    }

    /// Number of live items across both partitions
    pub fn len(&self) -> usize {
        self.incomplete.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live item by id
    pub fn get(&self, todo_id: TodoId) -> Option<&Todo> {
        self.locate(todo_id)
            .map(|(partition, index)| &self.partition(partition)[index])
    }

    pub fn contains(&self, todo_id: TodoId) -> bool {
        self.locate(todo_id).is_some()
    }

    /// Whether the id was removed at some point
    pub fn is_retired(&self, todo_id: TodoId) -> bool {
        self.retired.contains(&todo_id)
    }

    /// Partition and index of a live item
    pub fn locate(&self, todo_id: TodoId) -> Option<(Partition, usize)> {
        if let Some(index) = self.incomplete.iter().position(|t| t.id == todo_id) {
            return Some((Partition::Incomplete, index));
        }
        self.completed
            .iter()
            .position(|t| t.id == todo_id)
            .map(|index| (Partition::Completed, index))
    }

    pub fn partition(&self, partition: Partition) -> &[Todo] {
        match partition {
            Partition::Incomplete => &self.incomplete,
            Partition::Completed => &self.completed,
        }
    }

    /// Apply an event to the in-memory state and buffer it for appending
    pub(crate) fn record(&mut self, event: TodoListEvent) {
        self.apply(&event);
        self.uncommitted.push(DomainEvent::new(self.id, event));
    }

    /// Fold one event into the state
    ///
    /// Never fails: events are facts. References to items that are no longer
    /// live are ignored.
    fn apply(&mut self, event: &TodoListEvent) {
        match event {
            TodoListEvent::TodoAdded { todo_id, name, .. } => {
                if self.contains(*todo_id) || self.is_retired(*todo_id) {
                    warn!("Ignoring TodoAdded for reused id {} in list {}", todo_id, self.id);
                    return;
                }
                self.incomplete.push(Todo::new(*todo_id, name.clone()));
                self.reindex(Partition::Incomplete);
            }

            TodoListEvent::TodoRenamed { todo_id, name } => {
                match self.locate(*todo_id) {
                    Some((partition, index)) => {
                        self.partition_mut(partition)[index].name = name.clone();
                    }
                    None => self.ignore_stale(event),
                }
            }

            TodoListEvent::TodoCompleted {
                todo_id,
                completed_at,
            } => match self.locate(*todo_id) {
                Some((Partition::Incomplete, index)) => {
                    let mut todo = self.incomplete.remove(index);
                    todo.completed_at = Some(*completed_at);
                    self.completed.push(todo);
                    self.reindex(Partition::Incomplete);
                    self.reindex(Partition::Completed);
                }
                Some((Partition::Completed, _)) => {
                    debug!("Todo {} already completed", todo_id);
                }
                None => self.ignore_stale(event),
            },

            TodoListEvent::TodoUncompleted { todo_id } => match self.locate(*todo_id) {
                Some((Partition::Completed, index)) => {
                    let mut todo = self.completed.remove(index);
                    todo.completed_at = None;
                    self.incomplete.push(todo);
                    self.reindex(Partition::Completed);
                    self.reindex(Partition::Incomplete);
                }
                Some((Partition::Incomplete, _)) => {
                    debug!("Todo {} already incomplete", todo_id);
                }
                None => self.ignore_stale(event),
            },

            TodoListEvent::TodoMoved { todo_id, delta } => match self.locate(*todo_id) {
                Some((partition, index)) => {
                    let items = self.partition_mut(partition);
                    match delta.target_index(index, items.len()) {
                        Some(target) => {
                            items.swap(index, target);
                            self.reindex(partition);
                        }
                        None => debug!("Todo {} already at boundary, move {} clamped", todo_id, delta),
                    }
                }
                None => self.ignore_stale(event),
            },

            TodoListEvent::TodoRemoved { todo_id } => {
                match self.locate(*todo_id) {
                    Some((partition, index)) => {
                        self.partition_mut(partition).remove(index);
                        self.reindex(partition);
                    }
                    None => self.ignore_stale(event),
                }
                self.retired.insert(*todo_id);
            }
        }
    }

    fn ignore_stale(&self, event: &TodoListEvent) {
        warn!(
            "Ignoring {} for todo {} which is not live in list {}",
            event.event_type_name(),
            event.todo_id(),
            self.id
        );
    }

    fn partition_mut(&mut self, partition: Partition) -> &mut Vec<Todo> {
        match partition {
            Partition::Incomplete => &mut self.incomplete,
            Partition::Completed => &mut self.completed,
        }
    }

    /// Rewrite positions so they are contiguous from zero
    fn reindex(&mut self, partition: Partition) {
        for (position, todo) in self.partition_mut(partition).iter_mut().enumerate() {
            todo.position = position;
        }
    }
}
