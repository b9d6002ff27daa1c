//! API endpoint integration tests
//!
//! Tests for the sessions and candidates endpoints through the composed router.

#![allow(dead_code)]

mod candidates;
mod common;
mod sessions;
