//! Value types shared across the resolution pipeline.
//!
//! # Design
//! Call-site arguments are JSON-shaped (`serde_json::Value`) so route tables,
//! client configuration and per-call objects can all be written with
//! `serde_json::json!` or loaded from files. Opaque bodies (raw bytes,
//! pre-encoded multipart) enter through [`Input::Binary`] and are never
//! inspected for directive keys.

use serde::Serialize;
use serde_json::{Map, Value};

/// Configuration options forwarded to the transport untouched.
pub type Options = Map<String, Value>;

/// Placeholder name to replacement value, built fresh for every call.
pub type VariablesMap = Map<String, Value>;

/// A caller-supplied argument before splitting.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Json(Value),
    Binary {
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl Input {
    pub fn binary(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Input::Binary {
            content_type: Some(content_type.into()),
            bytes: bytes.into(),
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Input::Json(Value::Object(Map::new()))
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Json(value)
    }
}

impl From<Map<String, Value>> for Input {
    fn from(map: Map<String, Value>) -> Self {
        Input::Json(Value::Object(map))
    }
}

impl From<Vec<u8>> for Input {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Binary {
            content_type: None,
            bytes,
        }
    }
}

/// The data portion of a request descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Plain payload keys left over after directives and options were split off.
    Fields(Map<String, Value>),
    /// Non-object JSON (arrays, strings, numbers) passed through as-is.
    Json(Value),
    /// Opaque body, never split.
    Binary {
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
}

impl Payload {
    /// The payload's named fields, if it has any.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        match self {
            Payload::Fields(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Fields(map) => map.is_empty(),
            Payload::Json(value) => value.is_null(),
            Payload::Binary { bytes, .. } => bytes.is_empty(),
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Payload::Fields(map),
            other => Payload::Json(other),
        }
    }
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Fields(Map::new())
    }
}
