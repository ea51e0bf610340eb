// Copyright (c) 2025 - Cowboy AI, Inc.

//! JetStream configuration and setup for TodoList event logs
//!
//! Every TodoList aggregate gets its own subject under a common prefix, all
//! captured by one persistent stream:
//!
//! ```text
//! stream TODOLIST_EVENTS ← subjects "todolist.>"
//!     todolist.<list-id-1>   one message per append (a batch of records)
//!     todolist.<list-id-2>
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_todolist::jetstream::{JetStreamConfig, create_todolist_stream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = async_nats::connect("nats://localhost:4222").await?;
//!     let jetstream = async_nats::jetstream::new(client);
//!
//!     let config = JetStreamConfig::default();
//!     let stream = create_todolist_stream(jetstream, &config).await?;
//!
//!     Ok(())
//! }
//! ```

use async_nats::jetstream::{self, stream::Stream};
use std::time::Duration;

use crate::domain::TodoListId;
use crate::errors::{StoreError, StoreResult};

/// Configuration for the TodoList event stream
#[derive(Debug, Clone)]
pub struct JetStreamConfig {
    /// Stream name
    pub stream_name: String,

    /// Subject prefix; aggregate subjects are `<prefix>.<list-id>`
    pub subject_prefix: String,

    /// Maximum age of messages (zero keeps events forever)
    pub max_age: Duration,

    /// Maximum bytes stored in stream (-1 for unlimited)
    pub max_bytes: i64,

    /// Storage type (File or Memory)
    pub storage: StorageType,

    /// Number of replicas (for clustered NATS)
    pub replicas: usize,

    /// How long a read waits for a batch before treating the log as drained
    pub fetch_expiry: Duration,

    /// Attempts an unconditional append makes when it loses a race
    pub max_append_attempts: usize,
}

impl Default for JetStreamConfig {
    fn default() -> Self {
        Self {
            stream_name: "TODOLIST_EVENTS".to_string(),
            subject_prefix: "todolist".to_string(),
            max_age: Duration::ZERO,
            max_bytes: -1,
            storage: StorageType::File,
            replicas: 1,
            fetch_expiry: Duration::from_secs(2),
            max_append_attempts: 5,
        }
    }
}

impl JetStreamConfig {
    /// Subject carrying one aggregate's log
    pub fn aggregate_subject(&self, aggregate_id: TodoListId) -> String {
        format!("{}.{}", self.subject_prefix, aggregate_id)
    }

    /// Wildcard captured by the stream
    pub fn stream_subjects(&self) -> Vec<String> {
        vec![format!("{}.>", self.subject_prefix)]
    }
}

/// Storage type for JetStream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// File-based storage (persistent across restarts)
    File,
    /// Memory-based storage (faster, but lost on restart)
    Memory,
}

/// Create or update the TodoList events stream
///
/// Idempotent: creates the stream if it doesn't exist, otherwise returns it.
/// Retention is always limits-based; an event log must not drop messages on
/// acknowledgement.
pub async fn create_todolist_stream(
    jetstream: jetstream::Context,
    config: &JetStreamConfig,
) -> StoreResult<Stream> {
    let storage = match config.storage {
        StorageType::File => jetstream::stream::StorageType::File,
        StorageType::Memory => jetstream::stream::StorageType::Memory,
    };

    let stream_config = jetstream::stream::Config {
        name: config.stream_name.clone(),
        subjects: config.stream_subjects(),
        max_age: config.max_age,
        max_bytes: config.max_bytes,
        storage,
        num_replicas: config.replicas,
        retention: jetstream::stream::RetentionPolicy::Limits,
        ..Default::default()
    };

    let stream = jetstream
        .get_or_create_stream(stream_config)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

    Ok(stream)
}
