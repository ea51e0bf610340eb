// Copyright (c) 2025 - Cowboy AI, Inc.
//! Rendering collaborator

use async_trait::async_trait;

use crate::aggregate::TodoList;

/// Rebuilds a view of a list after every synchronization cycle
///
/// The list handed in is always a fresh replay of the durable log, never the
/// instance a command ran against.
#[async_trait]
pub trait ViewRenderer: Send + Sync {
    async fn render(&self, list: &TodoList);
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

#[async_trait]
impl ViewRenderer for NullRenderer {
    async fn render(&self, _list: &TodoList) {}
}
