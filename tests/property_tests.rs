// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify properties that must hold for
//! every reachable TodoList state and every well-formed event log.

mod fixtures;
mod property;
