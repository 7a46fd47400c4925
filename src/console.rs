//! Console capture: entries forwarded out of the realm, kept in a bounded
//! ring on the host side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    Log,
    Warn,
    Error,
    Info,
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub id: u64,
    pub method: ConsoleMethod,
    pub args: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// A value crossing the realm boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleArg {
    Text(String),
    Json(serde_json::Value),
    /// Anything without a JSON shape; carried as its display form.
    Opaque(String),
}

impl ConsoleArg {
    /// Strings pass through, structured values are JSON-encoded, and
    /// anything that fails to encode falls back to its display form.
    pub fn stringify(&self) -> String {
        match self {
            ConsoleArg::Text(s) => s.clone(),
            ConsoleArg::Json(serde_json::Value::String(s)) => s.clone(),
            ConsoleArg::Json(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
            }
            ConsoleArg::Opaque(display) => display.clone(),
        }
    }

    /// Encodes any serializable value, falling back to `Display` when it
    /// has no JSON form (e.g. maps with non-string keys).
    pub fn from_value<T>(value: &T) -> Self
    where
        T: Serialize + fmt::Display,
    {
        match serde_json::to_value(value) {
            Ok(json) => ConsoleArg::Json(json),
            Err(_) => ConsoleArg::Opaque(value.to_string()),
        }
    }
}

impl From<&str> for ConsoleArg {
    fn from(value: &str) -> Self {
        ConsoleArg::Text(value.to_string())
    }
}

impl From<String> for ConsoleArg {
    fn from(value: String) -> Self {
        ConsoleArg::Text(value)
    }
}

impl From<serde_json::Value> for ConsoleArg {
    fn from(value: serde_json::Value) -> Self {
        ConsoleArg::Json(value)
    }
}

pub fn stringify_args(args: &[ConsoleArg]) -> Vec<String> {
    args.iter().map(ConsoleArg::stringify).collect()
}

/// Append-only ring; the oldest entry is dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    entries: VecDeque<ConsoleEntry>,
    capacity: usize,
    next_id: u64,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    pub fn push(&mut self, method: ConsoleMethod, args: Vec<String>) -> &ConsoleEntry {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        let entry = ConsoleEntry {
            id: self.next_id,
            method,
            args,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push_back(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    pub fn snapshot(&self) -> Vec<ConsoleEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
