//! Log record structure and context map

use super::level::Level;
use super::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Ordered key-value context attached to a record.
///
/// Backed by a `BTreeMap` so rendered output is deterministic regardless of
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    fields: BTreeMap<String, Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Attach one field, builder style
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attach one field in place
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields, in key order
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// True when no fields are set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Merge another context into this one; fields already present here win.
    pub fn merge_defaults(&mut self, defaults: &Context) {
        for (key, value) in &defaults.fields {
            if !self.fields.contains_key(key) {
                self.fields.insert(key.clone(), value.clone());
            }
        }
    }

    /// Format fields as `key=value` pairs joined with `|`
    pub fn format_fields(&self) -> String {
        self.fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Render as a JSON object, preserving array structure
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json_value()))
                .collect(),
        )
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One structured log event.
///
/// Created by a [`Logger`](crate::core::Logger) at log-call time and not
/// mutated afterwards; filters that need to change a record replace it.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: Level,
    pub level_text: String,
    pub context: Context,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl Record {
    /// Sanitize the message to prevent log injection
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences so
    /// a message can never split a line-oriented destination's framing.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: Self::sanitize_message(&message.into()),
            level,
            level_text: level.as_str().to_string(),
            context: Context::new(),
            channel: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}
