// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - [`commands`] - arbitrary command sequences against a live aggregate
//! - [`replay`] - arbitrary (possibly raced) logs folded by replay

use std::collections::HashSet;

use cim_todolist::aggregate::TodoList;
use proptest::prelude::*;

mod commands;
mod replay;

/// Partition invariants every reachable state satisfies
///
/// - no id is in both partitions
/// - incomplete items carry no completion time, completed items do
/// - positions in each partition are exactly `0..len`
/// - no live id is retired
fn check_partitions(list: &TodoList) -> Result<(), TestCaseError> {
    let open: HashSet<_> = list.todos().iter().map(|t| t.id).collect();
    let done: HashSet<_> = list.completed_todos().iter().map(|t| t.id).collect();

    prop_assert!(open.is_disjoint(&done), "Partitions must be disjoint");
    prop_assert_eq!(open.len(), list.todos().len(), "Ids must be unique");
    prop_assert_eq!(done.len(), list.completed_todos().len(), "Ids must be unique");

    prop_assert!(list.todos().iter().all(|t| t.completed_at.is_none()));
    prop_assert!(list.completed_todos().iter().all(|t| t.completed_at.is_some()));

    for items in [list.todos(), list.completed_todos()] {
        let positions: Vec<usize> = items.iter().map(|t| t.position).collect();
        let expected: Vec<usize> = (0..items.len()).collect();
        prop_assert_eq!(positions, expected, "Positions must be contiguous from zero");
    }

    prop_assert!(open.union(&done).all(|id| !list.is_retired(*id)));
    Ok(())
}
