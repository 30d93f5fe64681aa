//! Pluggable deserialization of stored values.

use crate::error::{RehydrateError, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Custom deserializer signature.
pub type DeserializeFn = dyn Fn(&str) -> Result<Value> + Send + Sync;

/// Turns a stored textual value into a structured value.
#[derive(Clone, Default)]
pub enum Serializer {
    /// Parse the stored text as JSON.
    #[default]
    Json,
    /// Serialization disabled: the stored text is passed through as a string.
    Passthrough,
    /// Caller-supplied deserializer.
    Custom(Arc<DeserializeFn>),
}

impl Serializer {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        Serializer::Custom(Arc::new(f))
    }

    /// Deserialize the value stored for `slice`.
    pub fn deserialize(&self, slice: &str, serialized: &str) -> Result<Value> {
        match self {
            Serializer::Json => {
                serde_json::from_str(serialized).map_err(|e| RehydrateError::Deserialization {
                    key: slice.to_string(),
                    reason: e.to_string(),
                })
            }
            Serializer::Passthrough => Ok(Value::String(serialized.to_string())),
            Serializer::Custom(f) => f(serialized).map_err(|e| match e {
                RehydrateError::Deserialization { reason, .. } => {
                    RehydrateError::Deserialization {
                        key: slice.to_string(),
                        reason,
                    }
                }
                other => other,
            }),
        }
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Serializer::Json => write!(f, "Json"),
            Serializer::Passthrough => write!(f, "Passthrough"),
            Serializer::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}
