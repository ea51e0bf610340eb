// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream Event Store Implementation
//!
//! Implements [`EventStore`] on top of NATS JetStream.
//!
//! - One subject per aggregate: `<prefix>.<list-id>`
//! - One JetStream message per append holding the whole batch, so readers
//!   never observe half an append
//! - Sequence assignment is guarded by the
//!   `Nats-Expected-Last-Subject-Sequence` header: the server refuses a
//!   publish if another append landed on the subject since it was read
//!
//! - Every batch also carries `Nats-Msg-Id: <list-id>:<first sequence>`, so
//!   two appends numbered from the same base collide in the stream's
//!   duplicate window. This covers the first append to an empty subject,
//!   where older servers may read an expected subject sequence of 0 as
//!   "no check".
//! - A message whose batch does not decode is reported as
//!   `StoreError::Serialization` naming its subject and stream sequence;
//!   records that decode but carry a bad event are left to replay.
//!
//! When no expected sequence is given, a refused publish is re-read,
//! renumbered and retried (bounded by `max_append_attempts`). With an
//! expected sequence the refusal is reported as `Conflict`.

use std::sync::Arc;

use async_nats::jetstream::{self, stream::Stream};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::{check_batch, check_expected, EventStore};
use crate::domain::{Clock, SystemClock, TodoListId};
use crate::errors::{StoreError, StoreResult};
use crate::events::{DomainEvent, StoredEvent};
use crate::jetstream::{create_todolist_stream, JetStreamConfig};

const EXPECTED_LAST_SUBJECT_SEQUENCE: &str = "Nats-Expected-Last-Subject-Sequence";
const MSG_ID: &str = "Nats-Msg-Id";

/// Batch size for reading a log back
const FETCH_BATCH_SIZE: usize = 1000;

/// NATS JetStream-backed event store
///
/// # Example
///
/// ```rust,no_run
/// use cim_todolist::event_store::NatsEventStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = NatsEventStore::connect("nats://localhost:4222").await?;
///     // Use store...
///     Ok(())
/// }
/// ```
pub struct NatsEventStore {
    /// NATS JetStream context
    jetstream: jetstream::Context,

    /// JetStream stream holding every TodoList log
    stream: Stream,

    config: JetStreamConfig,

    /// Assigns `occurred_at` when the producer did not
    clock: Arc<dyn Clock>,
}

/// A log as read from JetStream
struct SubjectLog {
    events: Vec<StoredEvent>,

    /// Stream sequence of the subject's last message (0 if none)
    last_stream_sequence: u64,
}

impl SubjectLog {
    fn current_sequence(&self) -> u64 {
        self.events.last().map(|e| e.sequence).unwrap_or(0)
    }
}

impl NatsEventStore {
    /// Connect to NATS with the default stream configuration
    pub async fn connect(nats_url: &str) -> StoreResult<Self> {
        Self::connect_with_config(nats_url, JetStreamConfig::default()).await
    }

    /// Connect with custom configuration
    pub async fn connect_with_config(nats_url: &str, config: JetStreamConfig) -> StoreResult<Self> {
        let client = async_nats::connect(nats_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let jetstream = jetstream::new(client);
        let stream = create_todolist_stream(jetstream.clone(), &config).await?;

        info!("Connected TodoList event store to {} (stream {})", nats_url, config.stream_name);

        Ok(Self {
            jetstream,
            stream,
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for store-assigned timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Read every message on an aggregate's subject
    async fn read_log(&self, aggregate_id: TodoListId) -> StoreResult<SubjectLog> {
        let consumer = self
            .stream
            .create_consumer(jetstream::consumer::pull::Config {
                filter_subject: self.config.aggregate_subject(aggregate_id),
                ..Default::default()
            })
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut log = SubjectLog {
            events: Vec::new(),
            last_stream_sequence: 0,
        };

        loop {
            let messages_result = consumer
                .fetch()
                .max_messages(FETCH_BATCH_SIZE)
                .expires(self.config.fetch_expiry)
                .messages()
                .await;

            // A timeout here means the subject is drained
            let mut messages = match messages_result {
                Ok(msgs) => msgs,
                Err(e) => {
                    let err_msg = e.to_string().to_lowercase();
                    if err_msg.contains("timeout") || err_msg.contains("timed out") || err_msg.contains("no messages") {
                        break;
                    }
                    return Err(StoreError::Unavailable(e.to_string()));
                }
            };

            let mut batch_count = 0;

            while let Some(message) = messages.next().await {
                let msg = message.map_err(|e| StoreError::Unavailable(e.to_string()))?;

                let info = msg.info().map_err(|e| StoreError::Unavailable(e.to_string()))?;
                let stream_sequence = info.stream_sequence;

                log.events.extend(decode_batch(&msg.subject, stream_sequence, &msg.payload)?);
                log.last_stream_sequence = log.last_stream_sequence.max(stream_sequence);

                msg.ack()
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;

                batch_count += 1;
            }

            if batch_count < FETCH_BATCH_SIZE {
                break;
            }
        }

        log.events.sort_by_key(|e| e.sequence);
        Ok(log)
    }

    /// Publish a batch guarded by the subject's last stream sequence
    ///
    /// Returns `Ok(false)` when the server refused it because the subject
    /// moved on since `log` was read.
    async fn publish_batch(
        &self,
        aggregate_id: TodoListId,
        records: &[StoredEvent],
        log: &SubjectLog,
    ) -> StoreResult<bool> {
        let payload = serde_json::to_vec(records)?;

        let mut headers = async_nats::HeaderMap::new();
        let expected = log.last_stream_sequence.to_string();
        headers.insert(EXPECTED_LAST_SUBJECT_SEQUENCE, expected.as_str());
        let first = records.first().map(|r| r.sequence).unwrap_or(0);
        headers.insert(MSG_ID, batch_message_id(aggregate_id, first).as_str());

        let ack = self
            .jetstream
            .publish_with_headers(self.config.aggregate_subject(aggregate_id), headers, payload.into())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match ack.await {
            // Another append already claimed this first sequence
            Ok(ack) if ack.duplicate => Ok(false),
            Ok(_) => Ok(true),
            Err(e) if e.to_string().to_lowercase().contains("wrong last sequence") => Ok(false),
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        }
    }
}

/// Dedupe id for a batch whose first record is `first_sequence`
fn batch_message_id(aggregate_id: TodoListId, first_sequence: u64) -> String {
    format!("{aggregate_id}:{first_sequence}")
}

fn decode_batch(subject: &str, stream_sequence: u64, payload: &[u8]) -> StoreResult<Vec<StoredEvent>> {
    serde_json::from_slice(payload).map_err(|e| {
        StoreError::Serialization(format!(
            "undecodable batch on {subject} at stream sequence {stream_sequence}: {e}"
        ))
    })
}

#[async_trait]
impl EventStore for NatsEventStore {
    async fn fetch_by_aggregate(&self, aggregate_id: TodoListId) -> StoreResult<Vec<StoredEvent>> {
        Ok(self.read_log(aggregate_id).await?.events)
    }

    async fn append(
        &self,
        aggregate_id: TodoListId,
        events: Vec<DomainEvent>,
        expected_sequence: Option<u64>,
    ) -> StoreResult<u64> {
        check_batch(aggregate_id, &events)?;

        for attempt in 1..=self.config.max_append_attempts {
            let log = self.read_log(aggregate_id).await?;
            let current = log.current_sequence();
            check_expected(aggregate_id, expected_sequence, current)?;

            if events.is_empty() {
                return Ok(current);
            }

            let recorded_at = self.clock.now();
            let records = events
                .iter()
                .cloned()
                .zip(current + 1..)
                .map(|(event, sequence)| event.into_stored(sequence, recorded_at))
                .collect::<StoreResult<Vec<_>>>()?;

            if self.publish_batch(aggregate_id, &records, &log).await? {
                let last = current + records.len() as u64;
                debug!("Appended {} events to {} (sequence now {})", records.len(), aggregate_id, last);
                return Ok(last);
            }

            if let Some(expected) = expected_sequence {
                let actual = self.current_sequence(aggregate_id).await?.unwrap_or(0);
                return Err(StoreError::Conflict {
                    aggregate_id,
                    expected,
                    actual,
                });
            }

            warn!("Append to {} lost a race (attempt {}), renumbering", aggregate_id, attempt);
        }

        Err(StoreError::Unavailable(format!(
            "append to {} kept racing after {} attempts",
            aggregate_id, self.config.max_append_attempts
        )))
    }
}
