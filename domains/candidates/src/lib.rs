//! Candidates domain: resume submission proxy and SSE progress stream consumer

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::consumer::{
    consume_stream, ApplicantRecord, NonceBootstrap, SubmissionOutcome, SubmissionPayload,
};
pub use domain::error::ProxyError;
pub use domain::events::{EventKind, StreamingEvent};
pub use domain::sse::{SseDecoder, SseRecord};
pub use domain::submission::{Submission, SubmissionPart};

// Re-export API types
pub use api::handlers::submissions::relay;
pub use api::routes;
pub use api::CandidatesState;
