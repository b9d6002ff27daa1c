//! Session callback pipeline
//!
//! Two pure steps run around every sign-in and session read:
//! - [`jwt`] folds a freshly authorized user into the server-side token
//! - [`session`] projects the token onto the client-visible subset

use chrono::{DateTime, Duration, Utc};

use crate::claims::{ClientSession, SessionToken, SessionUser};
use crate::types::NormalizedUser;

/// JWT enrichment.
///
/// With a user (fresh sign-in) every normalized field is copied onto a new
/// token and `expires` becomes `now + expires_in`, or `now + default_ttl`
/// when upstream did not report a lifetime. Without a user (session read)
/// the existing token passes through unchanged. Expired tokens never reach
/// this step because the cookie codec rejects them.
pub fn jwt(
    token: Option<SessionToken>,
    user: Option<&NormalizedUser>,
    now: DateTime<Utc>,
    default_ttl: Duration,
) -> Option<SessionToken> {
    let Some(user) = user else {
        return token;
    };

    let ttl = user
        .expires_in
        .and_then(|secs| i64::try_from(secs).ok())
        .map(Duration::seconds)
        .unwrap_or(default_ttl);

    Some(SessionToken {
        id: user.id.clone(),
        email: user.email.clone(),
        firstname: user.firstname.clone(),
        lastname: user.lastname.clone(),
        access_token: user.access_token.clone(),
        refresh_token: user.refresh_token.clone(),
        expires_in: user.expires_in,
        expires: (now + ttl).timestamp(),
        user_type: user.user_type,
        organisations: user.organisations.clone(),
        mobile: user.mobile.clone(),
        linked_in_url: user.linked_in_url.clone(),
        application_id: user.application_id.clone(),
        vacancy_id: user.vacancy_id.clone(),
        pin_action: user.pin_action,
    })
}

/// Session projection onto the public-safe subset
pub fn session(token: &SessionToken) -> ClientSession {
    let name = if token.firstname.trim().is_empty() {
        token.email.clone()
    } else {
        token.firstname.clone()
    };

    ClientSession {
        user: SessionUser {
            id: token.id.clone(),
            name,
            email: token.email.clone(),
            user_type: token.user_type,
            mobile: token.mobile.clone(),
            linked_in_url: token.linked_in_url.clone(),
        },
        expires: DateTime::from_timestamp(token.expires, 0).unwrap_or_default(),
    }
}
