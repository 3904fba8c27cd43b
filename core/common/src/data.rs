//! Lenient attribute maps decoded from vault JSON.
//!
//! Profile files, band items, and decrypted overview/detail payloads all
//! decode to open JSON objects whose fields vary between vault versions.
//! `DataMap` wraps one and exposes typed accessors that return zero values
//! for missing or wrongly-typed keys, so a single odd field never fails a
//! whole record.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{Map, Value};

/// A decoded JSON object with lenient typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataMap(Map<String, Value>);

impl DataMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Raw access to a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Boolean value, or `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.0.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Integer value, or `0`.
    ///
    /// Vault files store numbers as 64-bit JSON numbers; non-integral
    /// values are truncated toward zero.
    pub fn get_i64(&self, key: &str) -> i64 {
        match self.0.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Unsigned 32-bit value, or `0`. Negative numbers clamp to `0`.
    pub fn get_u32(&self, key: &str) -> u32 {
        self.get_i64(key).clamp(0, u32::MAX as i64) as u32
    }

    /// String value, or `""`.
    pub fn get_str(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// List of strings; non-string elements are dropped.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// List of nested objects; non-object elements are dropped.
    pub fn get_map_list(&self, key: &str) -> Vec<DataMap> {
        match self.0.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_object)
                .map(|m| DataMap(m.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Base64-decoded bytes, or an empty buffer.
    ///
    /// Byte-valued fields are stored as standard-alphabet padded base64;
    /// a missing key, a non-string value, and a decode failure all yield
    /// an empty buffer.
    pub fn get_bytes(&self, key: &str) -> Vec<u8> {
        let encoded = self.get_str(key);
        if encoded.is_empty() {
            return Vec::new();
        }
        BASE64.decode(encoded).unwrap_or_default()
    }
}

impl From<Map<String, Value>> for DataMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
