#![forbid(unsafe_code)]

//! `HX-Trigger` header codec.
//!
//! Responses attach outcome events through a header whose value is either a
//! JSON object mapping event names to payloads, or a comma-separated list of
//! bare event names. Decoding preserves header order so events are routed in
//! the order the server emitted them.

use serde_json::{Map, Value};

use crate::outcome::{OutcomeEvent, OutcomeKind, OutcomePayload};

/// Errors decoding a trigger header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriggerError {
    /// The value looked like JSON but did not parse.
    #[error("malformed HX-Trigger JSON: {0}")]
    Json(String),
    /// The JSON value was not an object.
    #[error("HX-Trigger JSON must be an object, found {0}")]
    NotAnObject(&'static str),
}

/// Decode a header value into events, in header order.
pub fn decode_trigger_header(raw: &str) -> Result<Vec<OutcomeEvent>, TriggerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with('{') && !trimmed.starts_with('[') && !trimmed.starts_with('"') {
        return Ok(trimmed
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| OutcomeEvent::new(name, OutcomePayload::default()))
            .collect());
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(|err| TriggerError::Json(err.to_string()))?;
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(name, payload)| OutcomeEvent::new(name.clone(), OutcomePayload::from_value(payload)))
            .collect()),
        Value::Array(_) => Err(TriggerError::NotAnObject("array")),
        Value::String(_) => Err(TriggerError::NotAnObject("string")),
        _ => Err(TriggerError::NotAnObject("scalar")),
    }
}

/// Builder for header values.
#[derive(Debug, Clone, Default)]
pub struct TriggerHeader {
    events: Map<String, Value>,
}

impl TriggerHeader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event of a known kind.
    #[must_use]
    pub fn event(self, kind: OutcomeKind, payload: &OutcomePayload) -> Self {
        self.named(&kind.name(), payload)
    }

    /// Add an event by raw name.
    #[must_use]
    pub fn named(mut self, name: &str, payload: &OutcomePayload) -> Self {
        let value = serde_json::to_value(payload).unwrap_or(Value::Null);
        self.events.insert(name.to_string(), value);
        self
    }

    /// Whether no events were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Serialize to the header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        Value::Object(self.events.clone()).to_string()
    }
}
