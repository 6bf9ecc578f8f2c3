//! Destination configuration map

use super::error::{LogError, Result};
use super::value::Value;
use std::collections::BTreeMap;

/// Configuration handed to [`Destination::open`](crate::core::Destination::open).
///
/// A string-keyed [`Value`] map with typed accessors. `require_*` variants
/// produce a [`LogError`] naming the destination and the missing key, so
/// misconfiguration fails setup with something actionable.
///
/// # Example
///
/// ```
/// use logferry::core::DestinationConfig;
///
/// let config = DestinationConfig::new()
///     .set("host", "logs.example.com")
///     .set("port", 6514)
///     .set("use_tls", true);
///
/// assert_eq!(config.get_str("host"), Some("logs.example.com"));
/// assert_eq!(config.get_u64("port"), Some(6514));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DestinationConfig {
    values: BTreeMap<String, Value>,
}

impl DestinationConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Set a key (builder style)
    #[must_use]
    pub fn set<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set a key in place
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// String value of a key, if present and textual
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::String(s)) | Some(Value::Formatted(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer value of a key (non-negative)
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.values.get(key) {
            Some(Value::Int(i)) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get_u64(key).map(|v| v as usize)
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get_u64(key).and_then(|v| u32::try_from(v).ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get_u64(key).and_then(|v| u16::try_from(v).ok())
    }

    pub fn get_u8(&self, key: &str) -> Option<u8> {
        self.get_u64(key).and_then(|v| u8::try_from(v).ok())
    }

    /// Float value of a key; integers coerce
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(Value::Float(f)) => Some(*f),
            Some(Value::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Require a non-empty string value
    pub fn require_str(&self, destination: &str, key: &str) -> Result<&str> {
        match self.get_str(key) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(LogError::missing(destination, key)),
        }
    }

    pub fn require_u16(&self, destination: &str, key: &str) -> Result<u16> {
        self.get_u16(key)
            .ok_or_else(|| LogError::missing(destination, key))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DestinationConfig {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
