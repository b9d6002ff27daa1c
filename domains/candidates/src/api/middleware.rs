//! Candidates domain state

use std::time::Duration;

use growteam_sessions::UpstreamHandle;

/// Application state for the Candidates domain
#[derive(Clone)]
pub struct CandidatesState {
    pub upstream: UpstreamHandle,
    /// Longest silence tolerated between upstream stream chunks
    pub idle_timeout: Duration,
}
