//! API layer for the Candidates domain
//!
//! Contains the submission proxy handler, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::CandidatesState;
pub use routes::routes;
