//! Sessions domain: sign-in providers, session endpoints, PIN entry, route guard

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::credentials::{
    Credentials, NonceCredentials, PinCredentials, ProviderId, SignInForm, StaffCredentials,
};
pub use domain::guard::{guard, pin_action_for_path, pin_entry_path, GuardDecision};
pub use domain::providers::{
    ApplicantProvider, AuthorizeResult, PinProvider, RequestContext, SessionProvider,
    SessionProviders, StaffProvider, UpstreamHandle,
};
pub use domain::redirect::{default_landing, safe_redirect, sign_in_error_target};

// Re-export API types
pub use api::routes;
pub use api::{route_guard, SessionsState};
