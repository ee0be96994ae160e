// SPDX-License-Identifier: AGPL-3.0-or-later
//! Answer accumulator for the wizard
//!
//! Collected replies are kept in declaration order because the settings
//! document must list its assignments in the order the questions were asked.
//! Entries carry a `transient` marker so flow-control answers never leak
//! into the emitted artifact.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single collected value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Boolean reply from a yes/no choice
    Bool(bool),

    /// Numeric reply
    Int(i64),

    /// Free-text reply
    Text(String),
}

impl AnswerValue {
    /// Borrow the text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The boolean content, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Whether the value renders as the empty string
    pub fn is_empty(&self) -> bool {
        matches!(self, AnswerValue::Text(text) if text.is_empty())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(flag) => write!(formatter, "{}", flag),
            AnswerValue::Int(number) => write!(formatter, "{}", number),
            AnswerValue::Text(text) => write!(formatter, "{}", text),
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        AnswerValue::Text(text.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        AnswerValue::Text(text)
    }
}

impl From<bool> for AnswerValue {
    fn from(flag: bool) -> Self {
        AnswerValue::Bool(flag)
    }
}

impl From<i64> for AnswerValue {
    fn from(number: i64) -> Self {
        AnswerValue::Int(number)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    value: AnswerValue,
    transient: bool,
}

/// Ordered mapping from question identity to the accepted value
///
/// Skipped questions contribute no entry at all; absence is the only
/// representation of "not asked".
#[derive(Debug, Clone, Default)]
pub struct AnswerMap {
    entries: Vec<Entry>,
}

impl AnswerMap {
    /// Create an empty answer map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for `key`, replacing any previous entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.record(key.into(), value.into(), false);
    }

    /// Record a flow-control value that must not reach the settings document
    pub fn insert_transient(&mut self, key: impl Into<String>, value: impl Into<AnswerValue>) {
        self.record(key.into(), value.into(), true);
    }

    fn record(&mut self, key: String, value: AnswerValue, transient: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.value = value;
            entry.transient = transient;
        } else {
            self.entries.push(Entry {
                key,
                value,
                transient,
            });
        }
    }

    /// Look up a recorded value
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Look up a recorded text value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AnswerValue::as_str)
    }

    /// Look up a recorded boolean value
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(AnswerValue::as_bool)
    }

    /// Whether a value has been recorded for `key`
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Entries destined for the settings document, in insertion order
    pub fn public_entries(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.entries
            .iter()
            .filter(|entry| !entry.transient)
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
