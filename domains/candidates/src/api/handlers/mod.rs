//! HTTP handlers for the Candidates domain

pub mod submissions;
