//! Sign-in, session read, and sign-out handlers

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use growteam_auth::{jwt, session, NormalizedUser, SessionBackend};
use growteam_common::{Error, Result};
use serde_json::Value;

use crate::api::middleware::SessionsState;
use crate::domain::credentials::{is_safe_application_id, Credentials, ProviderId, SignInForm};
use crate::domain::providers::RequestContext;
use crate::domain::redirect::{default_landing, safe_redirect, sign_in_error_target};

/// Issue the session cookie for a freshly authorized user
pub(crate) fn start_session(
    backend: &SessionBackend,
    jar: CookieJar,
    user: &NormalizedUser,
) -> Result<CookieJar> {
    let now = Utc::now();
    let token = jwt(None, Some(user), now, backend.max_age())
        .ok_or_else(|| Error::Session("Session token was not produced".to_string()))?;
    let cookie = backend
        .session_cookie(&token, now)
        .map_err(|e| Error::Session(e.to_string()))?;
    Ok(jar.add(cookie))
}

/// `POST /api/auth/callback/{provider}`
pub async fn sign_in(
    State(state): State<SessionsState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Result<(CookieJar, Redirect)> {
    let provider: ProviderId = provider
        .parse()
        .map_err(|e: String| Error::NotFound(e))?;

    let application_id = form
        .application_id
        .as_deref()
        .filter(|id| is_safe_application_id(id));
    let error_target = sign_in_error_target(provider, application_id, form.callback_url.as_deref());

    let Some(credentials) = Credentials::from_form(provider, &form) else {
        tracing::debug!(provider = %provider, "Sign-in form incomplete");
        return Ok((jar, Redirect::to(&error_target)));
    };

    let ctx = RequestContext { headers: &headers };
    let user = state
        .providers
        .authorize(&credentials, &ctx)
        .await
        .map_err(|e| Error::Configuration(e.to_string()))?;

    let Some(user) = user else {
        return Ok((jar, Redirect::to(&error_target)));
    };

    let landing = default_landing(provider, user.application_id.as_deref(), user.pin_action);
    let target = safe_redirect(form.callback_url.as_deref(), &landing);
    let jar = start_session(&state.sessions, jar, &user)?;

    Ok((jar, Redirect::to(&target)))
}

/// `GET /api/auth/session`
///
/// Returns the client projection, or `{}` when signed out. A valid session
/// cookie is re-issued so its claims are carried forward on every read.
pub async fn get_session(
    State(state): State<SessionsState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>)> {
    let backend = &state.sessions;
    let now = Utc::now();

    let Some(token) = jwt(backend.read(&jar), None, now, backend.max_age()) else {
        let jar = if jar.get(&backend.config().cookie_name).is_some() {
            jar.add(backend.clear_cookie())
        } else {
            jar
        };
        return Ok((jar, Json(Value::Object(Default::default()))));
    };

    let cookie = backend
        .session_cookie(&token, now)
        .map_err(|e| Error::Session(e.to_string()))?;
    let projected = serde_json::to_value(session(&token))?;

    Ok((jar.add(cookie), Json(projected)))
}

/// `POST /api/auth/signout`
pub async fn sign_out(State(state): State<SessionsState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(state.sessions.clear_cookie()), Redirect::to("/"))
}
