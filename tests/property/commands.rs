// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Commands
//!
//! Arbitrary command sequences are run against a live aggregate; rejected
//! commands are part of the input space and simply ignored.

use std::collections::HashSet;

use cim_todolist::aggregate::TodoList;
use cim_todolist::domain::TodoId;
use proptest::prelude::*;

use super::check_partitions;
use crate::fixtures::{at_millis, list_id, stored_log, todo_id};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// A user action; `usize` picks an item among all ids ever added
#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Rename(usize, String),
    Complete(usize),
    Uncomplete(usize),
    Move(usize, i64),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[a-z ]{0,8}".prop_map(Op::Add),
        1 => (any::<usize>(), "[a-z ]{0,8}").prop_map(|(k, name)| Op::Rename(k, name)),
        2 => any::<usize>().prop_map(Op::Complete),
        1 => any::<usize>().prop_map(Op::Uncomplete),
        2 => (any::<usize>(), -2i64..=2).prop_map(|(k, delta)| Op::Move(k, delta)),
        1 => any::<usize>().prop_map(Op::Remove),
    ]
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op(), 0..60)
}

/// Everything a run produced besides the list itself
struct Run {
    list: TodoList,
    added: HashSet<TodoId>,
    removed: HashSet<TodoId>,
}

fn run(ops: &[Op]) -> Run {
    let mut list = TodoList::new(list_id());
    let mut ever: Vec<TodoId> = Vec::new();
    let mut added = HashSet::new();
    let mut removed = HashSet::new();

    let pick = |ever: &[TodoId], k: usize| ever.get(k % ever.len().max(1)).copied();

    for (step, op) in ops.iter().enumerate() {
        match op {
            Op::Add(name) => {
                let id = todo_id(1000 + step as u128);
                if list.add(id, name).is_ok() {
                    ever.push(id);
                    added.insert(id);
                }
            }
            Op::Rename(k, name) => {
                if let Some(id) = pick(&ever, *k) {
                    let _ = list.rename(id, name);
                }
            }
            Op::Complete(k) => {
                if let Some(id) = pick(&ever, *k) {
                    let _ = list.complete(id, at_millis(step as i64));
                }
            }
            Op::Uncomplete(k) => {
                if let Some(id) = pick(&ever, *k) {
                    let _ = list.uncomplete(id);
                }
            }
            Op::Move(k, delta) => {
                if let Some(id) = pick(&ever, *k) {
                    let _ = list.change_position(id, *delta);
                }
            }
            Op::Remove(k) => {
                if let Some(id) = pick(&ever, *k) {
                    if list.remove(id).is_ok() {
                        removed.insert(id);
                    }
                }
            }
        }
    }

    Run {
        list,
        added,
        removed,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Partition invariants hold after any command sequence
    #[test]
    fn prop_commands_preserve_invariants(ops in ops()) {
        let run = run(&ops);
        check_partitions(&run.list)?;
    }

    /// Property: Live ids are exactly the added ids minus the removed ones
    #[test]
    fn prop_partitions_cover_live_ids(ops in ops()) {
        let run = run(&ops);

        let live: HashSet<TodoId> = run
            .list
            .todos()
            .iter()
            .chain(run.list.completed_todos())
            .map(|t| t.id)
            .collect();
        let expected: HashSet<TodoId> = run.added.difference(&run.removed).copied().collect();

        prop_assert_eq!(live, expected);
    }

    /// Property: Replaying the emitted events rebuilds the live state
    #[test]
    fn prop_replay_matches_live_state(ops in ops()) {
        let mut run = run(&ops);
        let events = run.list.take_uncommitted_events();
        let log = stored_log(events.into_iter().map(|e| e.event).collect());

        let replayed = TodoList::replay(list_id(), &log).unwrap();

        prop_assert_eq!(replayed.todos(), run.list.todos());
        prop_assert_eq!(replayed.completed_todos(), run.list.completed_todos());
        prop_assert_eq!(replayed.version(), log.len() as u64);
    }

    /// Property: A rejected command emits nothing
    #[test]
    fn prop_rejected_commands_emit_nothing(ops in ops(), unknown in 0u128..1000) {
        let mut run = run(&ops);
        run.list.take_uncommitted_events();
        let before = run.list.clone();

        let missing = todo_id(unknown);
        prop_assert!(run.list.rename(missing, "x").is_err());
        prop_assert!(run.list.complete(missing, at_millis(0)).is_err());
        prop_assert!(run.list.change_position(missing, 1).is_err());
        prop_assert!(run.list.remove(missing).is_err());
        prop_assert!(run.list.add(todo_id(5000), "   ").is_err());

        prop_assert!(run.list.uncommitted_events().is_empty());
        prop_assert_eq!(run.list, before);
    }
}
