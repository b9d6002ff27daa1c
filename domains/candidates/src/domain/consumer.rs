//! Submission stream consumer
//!
//! Reads a submission's SSE body to the end, reporting every event as it
//! arrives and extracting the terminal payload from the last `success`
//! event.

use std::fmt::Display;

use futures_core::Stream;
use futures_util::StreamExt;
use growteam_sessions::NonceCredentials;
use growteam_upstream::{flexible_id, ApplicantProfile};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::events::{EventKind, StreamingEvent};
use super::sse::{SseDecoder, SseRecord};

/// Result of one submission stream
#[derive(Debug, Clone)]
pub struct SubmissionOutcome<T> {
    /// No event of type `error` was seen
    pub success: bool,
    /// Every event, in arrival order
    pub events: Vec<StreamingEvent>,
    pub payload: Option<T>,
}

impl<T> SubmissionOutcome<T> {
    /// Message of the last error event, shown to the user verbatim
    pub fn last_error(&self) -> Option<&str> {
        self.events
            .iter()
            .rev()
            .find(|e| e.is_error())
            .map(|e| e.message.as_str())
    }
}

/// Terminal payload that bootstraps an applicant session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NonceBootstrap {
    #[serde(deserialize_with = "flexible_id", alias = "applicantId")]
    pub id: String,
    pub nonce: String,
}

impl NonceBootstrap {
    /// Credentials for the applicant provider's nonce exchange
    pub fn into_credentials(self) -> NonceCredentials {
        NonceCredentials {
            nonce: self.nonce,
            applicant_id: Some(self.id),
            email: None,
        }
    }
}

/// Terminal payload describing the created applicant
pub type ApplicantRecord = ApplicantProfile;

/// Either terminal payload shape
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubmissionPayload {
    Bootstrap(NonceBootstrap),
    Applicant(ApplicantRecord),
}

/// Consume an SSE byte stream.
///
/// `on_event` runs for every event as soon as it is decoded. A transport
/// error ends consumption with one synthetic `error` event; a clean end of
/// stream without a terminal payload is returned as it stands.
pub async fn consume_stream<S, B, E, T, F>(stream: S, mut on_event: F) -> SubmissionOutcome<T>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    T: DeserializeOwned,
    F: FnMut(&StreamingEvent),
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = SseDecoder::new();
    let mut outcome = SubmissionOutcome {
        success: true,
        events: Vec::new(),
        payload: None,
    };

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                for record in decoder.push(bytes.as_ref()) {
                    accept(&mut outcome, &record, &mut on_event);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, events = outcome.events.len(), "Submission stream interrupted");
                let event = StreamingEvent::transport_error(format!("Connection lost: {}", e));
                on_event(&event);
                outcome.events.push(event);
                outcome.success = false;
                return outcome;
            }
        }
    }

    if let Some(record) = decoder.finish() {
        accept(&mut outcome, &record, &mut on_event);
    }

    if outcome.payload.is_none() && outcome.success {
        tracing::debug!(events = outcome.events.len(), "Submission stream ended without a payload");
    }
    outcome
}

fn accept<T, F>(outcome: &mut SubmissionOutcome<T>, record: &SseRecord, on_event: &mut F)
where
    T: DeserializeOwned,
    F: FnMut(&StreamingEvent),
{
    let (event, body) = StreamingEvent::from_record(record);

    if event.kind == EventKind::Success {
        if let Some(payload) = terminal_payload(&event, body) {
            outcome.payload = Some(payload);
        }
    }
    if event.is_error() {
        outcome.success = false;
    }

    on_event(&event);
    outcome.events.push(event);
}

fn terminal_payload<T: DeserializeOwned>(event: &StreamingEvent, body: Option<Value>) -> Option<T> {
    event
        .data
        .clone()
        .and_then(|data| serde_json::from_value(data).ok())
        .or_else(|| body.and_then(|body| serde_json::from_value(body).ok()))
}
