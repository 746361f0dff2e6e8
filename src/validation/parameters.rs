//! Inline parameter deserialization.
//!
//! The webhook only needs to know whether a parameter payload is well formed;
//! its contents belong to the service broker.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while deserializing a parameter payload.
#[derive(Error, Debug)]
pub enum ParameterError {
    /// Payload is not valid JSON
    #[error("failed to unmarshal parameters: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload is valid JSON but not an object
    #[error("parameters must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Deserializes an opaque parameter payload into a parameter map.
pub trait ParameterParser: Send + Sync {
    fn parse(&self, raw: &[u8]) -> Result<Map<String, Value>, ParameterError>;
}

/// Parses parameters as a JSON object.
///
/// An empty payload yields an empty map, matching how an absent body is
/// treated by the broker API.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonParameterParser;

impl ParameterParser for JsonParameterParser {
    fn parse(&self, raw: &[u8]) -> Result<Map<String, Value>, ParameterError> {
        if raw.is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_slice::<Value>(raw)? {
            Value::Object(map) => Ok(map),
            Value::Null => Err(ParameterError::NotAnObject("null")),
            Value::Bool(_) => Err(ParameterError::NotAnObject("boolean")),
            Value::Number(_) => Err(ParameterError::NotAnObject("number")),
            Value::String(_) => Err(ParameterError::NotAnObject("string")),
            Value::Array(_) => Err(ParameterError::NotAnObject("array")),
        }
    }
}

impl<F> ParameterParser for F
where
    F: Fn(&[u8]) -> Result<Map<String, Value>, ParameterError> + Send + Sync,
{
    fn parse(&self, raw: &[u8]) -> Result<Map<String, Value>, ParameterError> {
        self(raw)
    }
}
