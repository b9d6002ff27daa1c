//! Route guard
//!
//! Decides, per request, whether the caller may see a page or must be sent
//! to a sign-in entry point. The decision depends only on the path, query,
//! and decoded session; applying it twice yields the same answer.

use growteam_auth::{PinAction, SessionToken, UserType};
use regex::Regex;

lazy_static::lazy_static! {
    /// Ordered path → PIN action matchers; first match wins
    static ref PIN_ACTION_MATCHERS: Vec<(PinAction, Regex)> = vec![
        (PinAction::Profiling, Regex::new(r"/profiletest(/|$)").unwrap()),
        (PinAction::References, Regex::new(r"/references(/|$)").unwrap()),
    ];

    /// `/application/{id}/(profiletest|referees|references)` and anything below
    static ref PIN_SCOPED_ROUTE: Regex =
        Regex::new(r"^/application/([^/]+)/(profiletest|referees|references)(/.*)?$").unwrap();
}

pub const LOGIN_PATH: &str = "/login";
pub const APPLICANT_LOGIN_PATH: &str = "/applicant/login";
pub const EMPLOYER_HOME: &str = "/employer/dashboard";

/// Nonce bootstrap page reachable without a session
const NONCE_BOOTSTRAP_PATH: &str = "/profile/test";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// PIN action implied by a path, with any query or fragment stripped
pub fn pin_action_for_path(path: &str) -> Option<PinAction> {
    let (path, _) = split_target(path);
    PIN_ACTION_MATCHERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(path))
        .map(|(action, _)| *action)
}

/// PIN entry page for an application, carrying the original target
pub fn pin_entry_path(application_id: &str, next: Option<&str>) -> String {
    let base = format!("/application/{}/pin", application_id);
    match next {
        Some(next) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("next", next)
                .finish();
            format!("{}?{}", base, query)
        }
        None => base,
    }
}

/// Decide access for a request target (`path?query#fragment`)
pub fn guard(target: &str, session: Option<&SessionToken>) -> GuardDecision {
    let (path, query) = split_target(target);
    let user_type = session.map(|s| s.user_type);

    // PIN-scoped sessions only ever reach their own application's pages
    let has_account = matches!(user_type, Some(UserType::Staff | UserType::Applicant));

    if path == LOGIN_PATH && user_type == Some(UserType::Staff) {
        return GuardDecision::Redirect(EMPLOYER_HOME.to_string());
    }

    if is_within(path, "/employer") && !has_account {
        return GuardDecision::Redirect(LOGIN_PATH.to_string());
    }

    if (is_within(path, "/profile") || is_within(path, "/dashboard")) && !has_account {
        if path == NONCE_BOOTSTRAP_PATH && has_nonce_bootstrap(query) {
            return GuardDecision::Allow;
        }
        return GuardDecision::Redirect(APPLICANT_LOGIN_PATH.to_string());
    }

    if let Some(captures) = PIN_SCOPED_ROUTE.captures(path) {
        let application_id = &captures[1];
        if !pin_scope_permits(session, application_id, path) {
            let next = strip_fragment(target);
            return GuardDecision::Redirect(pin_entry_path(application_id, Some(next)));
        }
    }

    GuardDecision::Allow
}

fn pin_scope_permits(session: Option<&SessionToken>, application_id: &str, path: &str) -> bool {
    let Some(session) = session else {
        return false;
    };

    match session.user_type {
        UserType::Applicant => true,
        UserType::Application => {
            if session.application_id.as_deref() != Some(application_id) {
                return false;
            }
            match (pin_action_for_path(path), session.pin_action) {
                (Some(required), Some(granted)) => required == granted,
                _ => true,
            }
        }
        UserType::Staff => false,
    }
}

fn has_nonce_bootstrap(query: Option<&str>) -> bool {
    let Some(query) = query else {
        return false;
    };

    let mut nonce = false;
    let mut identity = false;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if value.trim().is_empty() {
            continue;
        }
        match key.as_ref() {
            "nonce" => nonce = true,
            "applicantId" | "email" => identity = true,
            _ => {}
        }
    }
    nonce && identity
}

/// `prefix` itself or anything below it
fn is_within(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn strip_fragment(target: &str) -> &str {
    target.split('#').next().unwrap_or(target)
}

fn split_target(target: &str) -> (&str, Option<&str>) {
    let without_fragment = strip_fragment(target);
    match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    }
}
