//! API layer for the Sessions domain
//!
//! Contains HTTP handlers, routes, the route guard, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::{route_guard, SessionsState};
pub use routes::routes;
