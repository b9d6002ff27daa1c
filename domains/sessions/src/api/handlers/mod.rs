//! HTTP handlers for the Sessions domain

pub mod auth;
pub mod pin;
