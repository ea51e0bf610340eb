// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Replay
//!
//! Logs here are arbitrary sequences of well-formed events over a small id
//! pool, so they include everything concurrent cycles can interleave:
//! renames of removed items, double completions, moves past boundaries.

use cim_todolist::aggregate::TodoList;
use cim_todolist::events::{MoveDelta, TodoListEvent};
use proptest::prelude::*;

use super::check_partitions;
use crate::fixtures::{added, at_millis, completed, list_id, moved, removed, renamed, stored_log, uncompleted};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Any event over item ids 1..=6
fn event() -> impl Strategy<Value = TodoListEvent> {
    let id = 1u128..=6;
    prop_oneof![
        3 => id.clone().prop_map(|n| added(n, &format!("T{n}"))),
        1 => (id.clone(), "[a-z]{1,6}").prop_map(|(n, name)| renamed(n, &name)),
        2 => (id.clone(), 0i64..10_000).prop_map(|(n, ms)| completed(n, at_millis(ms))),
        1 => id.clone().prop_map(uncompleted),
        2 => (id.clone(), any::<bool>()).prop_map(|(n, up)| {
            moved(n, if up { MoveDelta::Up } else { MoveDelta::Down })
        }),
        1 => id.prop_map(removed),
    ]
}

fn event_sequence() -> impl Strategy<Value = Vec<TodoListEvent>> {
    prop::collection::vec(event(), 0..50)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Replay is deterministic
    ///
    /// Given the same log, replay must always produce identical partitions.
    #[test]
    fn prop_replay_is_deterministic(events in event_sequence()) {
        let log = stored_log(events);

        let first = TodoList::replay(list_id(), &log).unwrap();
        let second = TodoList::replay(list_id(), &log).unwrap();

        prop_assert_eq!(first, second, "Same log must produce same state");
    }

    /// Property: Well-formed logs always replay, raced content included
    #[test]
    fn prop_well_formed_logs_replay(events in event_sequence()) {
        let log = stored_log(events);

        let list = TodoList::replay(list_id(), &log);

        prop_assert!(list.is_ok(), "Replay failed: {:?}", list.err());
    }

    /// Property: Partition invariants hold after any well-formed log
    #[test]
    fn prop_replay_preserves_invariants(events in event_sequence()) {
        let list = TodoList::replay(list_id(), &stored_log(events)).unwrap();
        check_partitions(&list)?;
    }

    /// Property: Version equals the number of events folded
    #[test]
    fn prop_version_counts_events(events in event_sequence()) {
        let log = stored_log(events);
        let list = TodoList::replay(list_id(), &log).unwrap();

        prop_assert_eq!(list.version(), log.len() as u64);
        prop_assert!(list.uncommitted_events().is_empty());
    }

    /// Property: Every prefix of a well-formed log is itself well-formed
    #[test]
    fn prop_every_prefix_replays(events in event_sequence(), cut in 0usize..50) {
        let log = stored_log(events);
        let cut = cut.min(log.len());

        let prefix = TodoList::replay(list_id(), &log[..cut]).unwrap();

        prop_assert_eq!(prefix.version(), cut as u64);
        check_partitions(&prefix)?;
    }
}
