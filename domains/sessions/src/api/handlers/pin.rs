//! PIN entry handler

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use growteam_common::{Error, Result};
use serde::Deserialize;

use super::auth::start_session;
use crate::api::middleware::SessionsState;
use crate::domain::credentials::{is_safe_application_id, PinCredentials, ProviderId};
use crate::domain::guard::pin_action_for_path;
use crate::domain::providers::{RequestContext, SessionProvider};
use crate::domain::redirect::{default_landing, safe_redirect, sign_in_error_target};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinForm {
    pub pin: Option<String>,
    pub pin_action: Option<String>,
    pub next: Option<String>,
}

/// `POST /application/{id}/pin`
///
/// Without an explicit `pinAction`, the hint is derived from the page the
/// caller was trying to reach.
pub async fn submit_pin(
    State(state): State<SessionsState>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<PinForm>,
) -> Result<(CookieJar, Redirect)> {
    let next = form.next.as_deref().map(|n| safe_redirect(Some(n), "/"));
    let entry_id = Some(application_id.as_str()).filter(|id| is_safe_application_id(id));
    let error_target = sign_in_error_target(ProviderId::Pin, entry_id, next.as_deref());

    let derived_hint = next
        .as_deref()
        .and_then(pin_action_for_path)
        .map(|a| a.as_str());
    let hint = form.pin_action.as_deref().or(derived_hint);

    let Some(credentials) = PinCredentials::parse(Some(&application_id), form.pin.as_deref(), hint)
    else {
        return Ok((jar, Redirect::to(&error_target)));
    };

    let ctx = RequestContext { headers: &headers };
    let user = state
        .providers
        .pin
        .authorize(&credentials, &ctx)
        .await
        .map_err(|e| Error::Configuration(e.to_string()))?;

    let Some(user) = user else {
        return Ok((jar, Redirect::to(&error_target)));
    };

    let landing = default_landing(ProviderId::Pin, Some(&application_id), user.pin_action);
    let target = next.unwrap_or(landing);
    let jar = start_session(&state.sessions, jar, &user)?;

    Ok((jar, Redirect::to(&target)))
}
