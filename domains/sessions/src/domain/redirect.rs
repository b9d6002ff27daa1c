//! Post sign-in redirect targets

use growteam_auth::PinAction;

use super::credentials::ProviderId;
use super::guard::{pin_entry_path, APPLICANT_LOGIN_PATH, EMPLOYER_HOME, LOGIN_PATH};

/// Generic error code so a failed login never reveals which field was wrong
pub const SIGN_IN_ERROR: &str = "CredentialsSignin";

/// Accept a caller-supplied target only if it is a same-site relative path
pub fn safe_redirect(target: Option<&str>, fallback: &str) -> String {
    match target.map(str::trim) {
        Some(t)
            if t.starts_with('/')
                && !t.starts_with("//")
                && !t.starts_with("/\\")
                && !t.chars().any(|c| c.is_control()) =>
        {
            t.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Where a provider lands the caller after a successful sign-in
pub fn default_landing(
    provider: ProviderId,
    application_id: Option<&str>,
    pin_action: Option<PinAction>,
) -> String {
    match (provider, application_id) {
        (ProviderId::Credentials, _) => EMPLOYER_HOME.to_string(),
        (ProviderId::Applicant, _) => "/dashboard".to_string(),
        (ProviderId::Pin, Some(id)) => match pin_action {
            Some(PinAction::References) => format!("/application/{}/references", id),
            Some(PinAction::Profiling) => format!("/application/{}/profiletest", id),
            None => format!("/application/{}", id),
        },
        (ProviderId::Pin, None) => "/".to_string(),
    }
}

/// Where a provider sends the caller after a denied sign-in
pub fn sign_in_error_target(
    provider: ProviderId,
    application_id: Option<&str>,
    next: Option<&str>,
) -> String {
    let page = match (provider, application_id) {
        (ProviderId::Credentials, _) => LOGIN_PATH.to_string(),
        (ProviderId::Applicant, _) => APPLICANT_LOGIN_PATH.to_string(),
        (ProviderId::Pin, Some(id)) => {
            let next = next.map(|n| safe_redirect(Some(n), "/"));
            let page = pin_entry_path(id, next.as_deref());
            return append_error(&page, "invalid");
        }
        (ProviderId::Pin, None) => "/".to_string(),
    };
    append_error(&page, SIGN_IN_ERROR)
}

fn append_error(page: &str, code: &str) -> String {
    let separator = if page.contains('?') { '&' } else { '?' };
    format!("{}{}error={}", page, separator, code)
}
