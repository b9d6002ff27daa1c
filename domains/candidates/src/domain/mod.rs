//! Candidates domain logic: submission form, SSE decoding, stream consumption

pub mod consumer;
pub mod error;
pub mod events;
pub mod sse;
pub mod submission;
