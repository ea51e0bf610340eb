// Copyright (c) 2025 - Cowboy AI, Inc.
//! Terminal TodoList
//!
//! Line-oriented driver for the TodoList service. Each line is one user
//! action and runs one synchronization cycle; the list is redrawn from the
//! durable log afterwards.
//!
//! ```text
//! add <name>            rename <item> <name>
//! complete <item>       uncomplete <item>
//! up <item>             down <item>
//! remove <item>         list
//! help                  quit
//! ```
//!
//! `<item>` is the 1-based number shown in the listing, or an item id.
//!
//! Run with: cargo run --bin todolist
//!
//! Environment:
//! - `TODOLIST_STORE` - `memory` (default) or `nats`
//! - `NATS_URL`, `TODOLIST_STREAM`, `TODOLIST_SUBJECT_PREFIX` - JetStream settings
//! - `TODOLIST_CONSISTENCY` - `optimistic` (default) or `expected-sequence`
//! - `TODOLIST_ID` - reopen an existing list

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cim_todolist::{
    aggregate::{TodoList, TodoListCommand},
    config::{AppConfig, StoreBackend, StoreConfig},
    domain::TodoId,
    event_store::{EventStore, InMemoryEventStore},
    service::{EventSourcedTodoListService, TodoListService, ViewRenderer},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// How a line refers to an item
#[derive(Debug, Clone, PartialEq, Eq)]
enum ItemRef {
    /// 1-based number in the listing
    Index(usize),
    Id(TodoId),
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Add(String),
    Rename(ItemRef, String),
    Complete(ItemRef),
    Uncomplete(ItemRef),
    Up(ItemRef),
    Down(ItemRef),
    Remove(ItemRef),
    List,
    Help,
    Quit,
}

const HELP: &str = "commands: add <name> | rename <item> <name> | complete <item> | \
                    uncomplete <item> | up <item> | down <item> | remove <item> | list | quit";

fn parse_item(word: Option<&str>) -> Result<ItemRef, String> {
    let word = word.ok_or_else(|| "missing item".to_string())?;

    if let Ok(index) = word.parse::<usize>() {
        return if index == 0 {
            Err("items are numbered from 1".to_string())
        } else {
            Ok(ItemRef::Index(index))
        };
    }

    word.parse::<TodoId>()
        .map(ItemRef::Id)
        .map_err(|_| format!("{word:?} is neither an item number nor an id"))
}

fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut words = rest.split_whitespace();

    let input = match verb.to_ascii_lowercase().as_str() {
        "add" => Input::Add(rest.to_string()),
        "rename" => {
            let item = parse_item(words.next())?;
            let name = rest
                .split_once(char::is_whitespace)
                .map(|(_, name)| name.trim().to_string())
                .unwrap_or_default();
            Input::Rename(item, name)
        }
        "complete" | "done" => Input::Complete(parse_item(words.next())?),
        "uncomplete" | "undo" => Input::Uncomplete(parse_item(words.next())?),
        "up" => Input::Up(parse_item(words.next())?),
        "down" => Input::Down(parse_item(words.next())?),
        "remove" | "rm" => Input::Remove(parse_item(words.next())?),
        "list" | "ls" => Input::List,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command {other:?}")),
    };

    Ok(Some(input))
}

/// Items in listing order: incomplete first, then completed
fn listing(list: &TodoList) -> Vec<TodoId> {
    list.todos()
        .iter()
        .chain(list.completed_todos())
        .map(|t| t.id)
        .collect()
}

fn resolve(list: &TodoList, item: &ItemRef) -> Result<TodoId, String> {
    match item {
        ItemRef::Id(id) => Ok(*id),
        ItemRef::Index(index) => listing(list)
            .get(index - 1)
            .copied()
            .ok_or_else(|| format!("there is no item {index}")),
    }
}

fn to_command(list: &TodoList, input: Input) -> Result<TodoListCommand, String> {
    let command = match input {
        Input::Add(name) => TodoListCommand::Add { name },
        Input::Rename(item, name) => TodoListCommand::Rename {
            todo_id: resolve(list, &item)?,
            name,
        },
        Input::Complete(item) => TodoListCommand::Complete {
            todo_id: resolve(list, &item)?,
        },
        Input::Uncomplete(item) => TodoListCommand::Uncomplete {
            todo_id: resolve(list, &item)?,
        },
        Input::Up(item) => TodoListCommand::MoveUp {
            todo_id: resolve(list, &item)?,
        },
        Input::Down(item) => TodoListCommand::MoveDown {
            todo_id: resolve(list, &item)?,
        },
        Input::Remove(item) => TodoListCommand::Remove {
            todo_id: resolve(list, &item)?,
        },
        Input::List | Input::Help | Input::Quit => {
            return Err("not a list command".to_string());
        }
    };
    Ok(command)
}

/// Draws both partitions on stdout
struct TerminalRenderer;

#[async_trait]
impl ViewRenderer for TerminalRenderer {
    async fn render(&self, list: &TodoList) {
        println!("── {} (version {}) ──", list.id(), list.version());

        if list.is_empty() {
            println!("   (empty)");
        }

        for (index, todo) in list.todos().iter().chain(list.completed_todos()).enumerate() {
            let mark = if todo.is_completed() { 'x' } else { ' ' };
            let done = todo
                .completed_at
                .map(|at| at.format(" (done %Y-%m-%d %H:%M)").to_string())
                .unwrap_or_default();
            println!("{:>3}. [{mark}] {}{}", index + 1, todo.name, done);
        }
    }
}

async fn open_store(config: &StoreConfig) -> Result<Arc<dyn EventStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("🗂️ Using in-memory event store");
            Ok(Arc::new(InMemoryEventStore::new()))
        }
        #[cfg(feature = "nats")]
        StoreBackend::Nats => {
            info!("🔌 Connecting to NATS at {}", config.nats_url);
            let store = cim_todolist::event_store::NatsEventStore::connect_with_config(
                &config.nats_url,
                config.jetstream(),
            )
            .await
            .context("Failed to open JetStream event store")?;
            info!("✅ Connected, stream {}", config.stream_name);
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "nats"))]
        StoreBackend::Nats => anyhow::bail!("built without the `nats` feature"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!("📋 Configuration loaded:");
    info!("  - Store: {:?}", config.store.backend);
    info!("  - Consistency: {:?}", config.service.consistency);

    let store = open_store(&config.store).await?;
    let service = EventSourcedTodoListService::new(store, Arc::new(TerminalRenderer))
        .with_config(config.service);

    let list_id = match config.list_id {
        Some(id) => id,
        None => service.create_list().await?,
    };
    info!("📝 Working on list {}", list_id);

    service
        .refresh(list_id)
        .await
        .context("Failed to load list")?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = match parse_line(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };

        match input {
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::List => {
                if let Err(e) = service.refresh(list_id).await {
                    warn!("❌ {}", e);
                }
            }
            input => {
                // Resolve item numbers against the current log, not a cached view
                let current = match service.load(list_id).await {
                    Ok(list) => list,
                    Err(e) => {
                        warn!("❌ {}", e);
                        continue;
                    }
                };

                let command = match to_command(&current, input) {
                    Ok(command) => command,
                    Err(e) => {
                        warn!("{}", e);
                        continue;
                    }
                };

                if let Err(e) = service.execute(list_id, command).await {
                    warn!("❌ {} failed: {}", e.phase(), e);
                }
            }
        }
    }

    info!("👋 Bye");
    Ok(())
}
