// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime Configuration
//!
//! Plain structs with defaults, loaded from environment variables:
//!
//! | Variable                  | Values                             | Default                 |
//! |---------------------------|------------------------------------|-------------------------|
//! | `TODOLIST_STORE`          | `memory`, `nats`                   | `memory`                |
//! | `NATS_URL`                | server URL                         | `localhost:4222`        |
//! | `TODOLIST_STREAM`         | JetStream stream name              | `TODOLIST_EVENTS`       |
//! | `TODOLIST_SUBJECT_PREFIX` | subject prefix                     | `todolist`              |
//! | `TODOLIST_CONSISTENCY`    | `optimistic`, `expected-sequence`  | `optimistic`            |
//! | `TODOLIST_ID`             | UUID of an existing list           | a fresh list            |

use std::str::FromStr;

use thiserror::Error;

use crate::domain::TodoListId;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {variable}: expected {expected}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Which event store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Nats,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "nats" | "jetstream" => Ok(StoreBackend::Nats),
            _ => Err(()),
        }
    }
}

/// How appends guard against a log that moved on since it was fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyMode {
    /// Append unconditionally; concurrent cycles merge
    #[default]
    Optimistic,

    /// Append only if the log still ends at the replayed version
    ExpectedSequence,
}

impl FromStr for ConsistencyMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(ConsistencyMode::Optimistic),
            "expected-sequence" | "expected_sequence" | "strict" => Ok(ConsistencyMode::ExpectedSequence),
            _ => Err(()),
        }
    }
}

/// Settings for the synchronization service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceConfig {
    pub consistency: ConsistencyMode,
}

/// Settings for the event store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub nats_url: String,
    pub stream_name: String,
    pub subject_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            nats_url: "localhost:4222".to_string(),
            stream_name: "TODOLIST_EVENTS".to_string(),
            subject_prefix: "todolist".to_string(),
        }
    }
}

impl StoreConfig {
    /// JetStream settings derived from this configuration
    #[cfg(feature = "nats")]
    pub fn jetstream(&self) -> crate::jetstream::JetStreamConfig {
        crate::jetstream::JetStreamConfig {
            stream_name: self.stream_name.clone(),
            subject_prefix: self.subject_prefix.clone(),
            ..Default::default()
        }
    }
}

/// Everything the terminal driver needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub service: ServiceConfig,

    /// Reopen this list instead of creating a new one
    pub list_id: Option<TodoListId>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any name → value lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StoreConfig::default();

        let store = StoreConfig {
            backend: parse_var(&lookup, "TODOLIST_STORE", "memory or nats")?.unwrap_or_default(),
            nats_url: lookup("NATS_URL").unwrap_or(defaults.nats_url),
            stream_name: lookup("TODOLIST_STREAM").unwrap_or(defaults.stream_name),
            subject_prefix: lookup("TODOLIST_SUBJECT_PREFIX").unwrap_or(defaults.subject_prefix),
        };

        let service = ServiceConfig {
            consistency: parse_var(&lookup, "TODOLIST_CONSISTENCY", "optimistic or expected-sequence")?
                .unwrap_or_default(),
        };

        let list_id = parse_var(&lookup, "TODOLIST_ID", "a UUID")?;

        Ok(Self {
            store,
            service,
            list_id,
        })
    }
}

fn parse_var<F, T>(lookup: &F, variable: &'static str, expected: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(variable) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
            variable,
            value,
            expected,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.service.consistency, ConsistencyMode::Optimistic);
        assert_eq!(config.list_id, None);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("TODOLIST_STORE", "nats"),
            ("NATS_URL", "nats://broker:4222"),
            ("TODOLIST_STREAM", "LISTS"),
            ("TODOLIST_SUBJECT_PREFIX", "lists"),
            ("TODOLIST_CONSISTENCY", "expected-sequence"),
            ("TODOLIST_ID", "00000000-0000-0000-0000-000000000001"),
        ]))
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Nats);
        assert_eq!(config.store.nats_url, "nats://broker:4222");
        assert_eq!(config.store.stream_name, "LISTS");
        assert_eq!(config.store.subject_prefix, "lists");
        assert_eq!(config.service.consistency, ConsistencyMode::ExpectedSequence);
        assert_eq!(
            config.list_id.map(|id| id.to_string()),
            Some("00000000-0000-0000-0000-000000000001".to_string())
        );
    }

    #[test_case("TODOLIST_STORE", "postgres" ; "unknown backend")]
    #[test_case("TODOLIST_CONSISTENCY", "eventual" ; "unknown consistency")]
    #[test_case("TODOLIST_ID", "not-a-uuid" ; "malformed list id")]
    fn test_rejects_bad_values(variable: &str, value: &str) {
        let result = AppConfig::from_lookup(lookup(&[(variable, value)]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { variable: v, .. }) if v == variable
        ));
    }
}
