//! Shared utilities, configuration, and error handling for Grow My Team
//!
//! This crate provides common functionality used across the service:
//! - Configuration management following 12-factor principles
//! - The HTTP error type and its JSON rendering
//! - Secret masking for log output

pub mod config;
pub mod error;
pub mod redact;

pub use config::Config;
pub use error::{Error, Result};
pub use redact::mask_secret;
