//! Streaming progress events

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sse::SseRecord;

/// Event type. Unknown names are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Info,
    Success,
    Error,
    Progress,
    Loading,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Info => "info",
            EventKind::Success => "success",
            EventKind::Error => "error",
            EventKind::Progress => "progress",
            EventKind::Loading => "loading",
            EventKind::Other(name) => name,
        }
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        match name {
            "info" => EventKind::Info,
            "success" => EventKind::Success,
            "error" => EventKind::Error,
            "progress" => EventKind::Progress,
            "loading" => EventKind::Loading,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        EventKind::from(name.as_str())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One progress event from a submission stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingEvent<T = Value> {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Lenient view of an event-shaped JSON body
#[derive(Deserialize)]
struct WireEvent {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
}

impl StreamingEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            progress: None,
            data: None,
            id: None,
            timestamp: None,
        }
    }

    /// Event standing in for a failed or interrupted transport
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self::new(EventKind::Error, message)
    }

    /// Interpret a decoded SSE record.
    ///
    /// Returns the event together with the record's parsed JSON body, if any.
    pub fn from_record(record: &SseRecord) -> (Self, Option<Value>) {
        match serde_json::from_str::<Value>(&record.data) {
            Ok(body) => {
                let mut event = Self::from_json(&record.event, body.clone());
                if event.id.is_none() {
                    event.id = record.id.clone();
                }
                (event, Some(body))
            }
            Err(_) => {
                let mut event = Self::new(EventKind::from(record.event.as_str()), &record.data);
                event.id = record.id.clone();
                (event, None)
            }
        }
    }

    /// Interpret a JSON body received under the SSE event name `event_name`
    pub fn from_json(event_name: &str, body: Value) -> Self {
        let fallback_kind = EventKind::from(event_name);

        if looks_like_event(&body) {
            if let Ok(wire) = serde_json::from_value::<WireEvent>(body.clone()) {
                return Self {
                    kind: wire.kind.map(EventKind::from).unwrap_or(fallback_kind),
                    message: wire.message.map(text).unwrap_or_default(),
                    progress: wire.progress.map(|p| p.clamp(0.0, 100.0)),
                    data: wire.data.filter(|d| !d.is_null()),
                    id: wire.id.map(text),
                    timestamp: wire.timestamp.map(text),
                };
            }
        }

        let mut event = Self::new(fallback_kind, String::new());
        event.data = Some(body);
        event
    }

    pub fn is_error(&self) -> bool {
        self.kind == EventKind::Error
    }
}

fn looks_like_event(body: &Value) -> bool {
    body.as_object()
        .is_some_and(|o| o.contains_key("type") || o.contains_key("message"))
}

fn text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
