// Copyright (c) 2025 - Cowboy AI, Inc.
//! Todo Name Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Todo name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoNameError {
    #[error("Todo name is empty")]
    Empty,
}

/// Display name of a todo item
///
/// Invariant: surrounding whitespace is trimmed and the remainder is non-empty.
/// Deserialization runs the same check, so a stored event carrying a blank
/// name fails to decode.
///
/// ```rust
/// use cim_todolist::domain::TodoName;
///
/// assert_eq!(TodoName::new("  Buy milk ").unwrap().as_str(), "Buy milk");
/// assert!(TodoName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoName(String);

impl TodoName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, TodoNameError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TodoNameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TodoName {
    type Error = TodoNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TodoName> for String {
    fn from(name: TodoName) -> Self {
        name.0
    }
}

impl fmt::Display for TodoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
