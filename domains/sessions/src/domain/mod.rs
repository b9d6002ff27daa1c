//! Sessions domain logic: credentials, providers, route guard, redirect targets

pub mod credentials;
pub mod guard;
pub mod providers;
pub mod redirect;
