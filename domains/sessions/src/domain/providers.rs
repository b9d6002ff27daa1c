//! Session providers
//!
//! Each provider authenticates one kind of caller against upstream and
//! normalizes the result into a [`NormalizedUser`]. Expected failures
//! (rejected credentials, upstream errors, malformed bodies) deny the login
//! with `Ok(None)`; only a missing API base is an error.

use std::sync::Arc;

use axum::http::HeaderMap;
use growteam_auth::{read_pin_action_claim, sentinel_email, NormalizedUser, UserType};
use growteam_upstream::{ApiBaseResolver, ConfigurationError, Grant, UpstreamApi, UpstreamError};

use super::credentials::{
    Credentials, NonceCredentials, PinCredentials, ProviderId, StaffCredentials,
};

/// Per-request inputs available to providers
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub headers: &'a HeaderMap,
}

pub type AuthorizeResult = Result<Option<NormalizedUser>, ConfigurationError>;

/// Contract shared by the three providers
#[async_trait::async_trait]
pub trait SessionProvider: Send + Sync {
    type Credentials: Send + Sync;

    fn id(&self) -> ProviderId;

    async fn authorize(
        &self,
        credentials: &Self::Credentials,
        ctx: &RequestContext<'_>,
    ) -> AuthorizeResult;
}

/// Upstream access shared by every provider
#[derive(Clone)]
pub struct UpstreamHandle {
    pub api: Arc<dyn UpstreamApi>,
    pub resolver: Arc<ApiBaseResolver>,
}

impl UpstreamHandle {
    pub fn new(api: Arc<dyn UpstreamApi>, resolver: Arc<ApiBaseResolver>) -> Self {
        Self { api, resolver }
    }

    fn base(&self, ctx: &RequestContext<'_>) -> Result<String, ConfigurationError> {
        self.resolver.resolve(ctx.headers).map_err(|e| {
            tracing::error!(error = %e, "No upstream API base for request");
            e
        })
    }
}

fn denied(provider: ProviderId, stage: &'static str, err: &UpstreamError) -> AuthorizeResult {
    tracing::warn!(
        provider = %provider,
        stage,
        status = ?err.status(),
        error = %err,
        "Sign-in denied"
    );
    Ok(None)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Staff username/password provider
#[derive(Clone)]
pub struct StaffProvider {
    upstream: UpstreamHandle,
}

impl StaffProvider {
    pub fn new(upstream: UpstreamHandle) -> Self {
        Self { upstream }
    }
}

#[async_trait::async_trait]
impl SessionProvider for StaffProvider {
    type Credentials = StaffCredentials;

    fn id(&self) -> ProviderId {
        ProviderId::Credentials
    }

    async fn authorize(
        &self,
        credentials: &StaffCredentials,
        ctx: &RequestContext<'_>,
    ) -> AuthorizeResult {
        let base = self.upstream.base(ctx)?;
        let grant = Grant::Password {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        };

        let token = match self.upstream.api.exchange_grant(&base, &grant).await {
            Ok(token) => token,
            Err(e) => return denied(self.id(), "exchange", &e),
        };

        let profile = match self
            .upstream
            .api
            .fetch_staff_profile(&base, &token.access_token)
            .await
        {
            Ok(profile) => profile,
            Err(e) => return denied(self.id(), "profile", &e),
        };

        let mut user = NormalizedUser::new(
            profile.id,
            profile.email,
            UserType::Staff,
            token.access_token,
        );
        user.firstname = profile.firstname.unwrap_or_default();
        user.lastname = profile.lastname.unwrap_or_default();
        user.refresh_token = token.refresh_token;
        user.expires_in = token.expires_in;
        user.organisations = profile.organisations.into_iter().map(Into::into).collect();

        tracing::info!(user_id = %user.id, "Staff signed in");
        Ok(Some(user))
    }
}

/// Applicant nonce provider, used for self-service login and post-upload auto login
#[derive(Clone)]
pub struct ApplicantProvider {
    upstream: UpstreamHandle,
}

impl ApplicantProvider {
    pub fn new(upstream: UpstreamHandle) -> Self {
        Self { upstream }
    }
}

#[async_trait::async_trait]
impl SessionProvider for ApplicantProvider {
    type Credentials = NonceCredentials;

    fn id(&self) -> ProviderId {
        ProviderId::Applicant
    }

    async fn authorize(
        &self,
        credentials: &NonceCredentials,
        ctx: &RequestContext<'_>,
    ) -> AuthorizeResult {
        let base = self.upstream.base(ctx)?;
        let grant = Grant::Nonce {
            applicant_id: credentials.applicant_id.clone(),
            email: credentials.email.clone(),
            nonce: credentials.nonce.clone(),
        };

        let token = match self.upstream.api.exchange_grant(&base, &grant).await {
            Ok(token) => token,
            Err(e) => return denied(self.id(), "exchange", &e),
        };

        let profile = match self
            .upstream
            .api
            .fetch_applicant(&base, &token.access_token)
            .await
        {
            Ok(profile) => profile,
            Err(e) => return denied(self.id(), "profile", &e),
        };

        let email = non_empty(profile.email)
            .or_else(|| credentials.email.clone())
            .unwrap_or_default();

        let mut user =
            NormalizedUser::new(profile.id, email, UserType::Applicant, token.access_token);
        user.firstname = profile.firstname.unwrap_or_default();
        user.lastname = profile.lastname.unwrap_or_default();
        user.expires_in = token.expires_in;
        user.mobile = non_empty(profile.mobile);
        user.linked_in_url = non_empty(profile.linked_in_url);

        tracing::info!(user_id = %user.id, "Applicant signed in");
        Ok(Some(user))
    }
}

/// PIN-scoped provider bound to one application
#[derive(Clone)]
pub struct PinProvider {
    upstream: UpstreamHandle,
}

impl PinProvider {
    pub fn new(upstream: UpstreamHandle) -> Self {
        Self { upstream }
    }
}

#[async_trait::async_trait]
impl SessionProvider for PinProvider {
    type Credentials = PinCredentials;

    fn id(&self) -> ProviderId {
        ProviderId::Pin
    }

    async fn authorize(
        &self,
        credentials: &PinCredentials,
        ctx: &RequestContext<'_>,
    ) -> AuthorizeResult {
        let base = self.upstream.base(ctx)?;
        let grant = Grant::Pin {
            application_id: credentials.application_id.clone(),
            pin: credentials.pin.clone(),
            pin_action: credentials.pin_action,
        };

        let token = match self.upstream.api.exchange_grant(&base, &grant).await {
            Ok(token) => token,
            Err(e) => return denied(self.id(), "exchange", &e),
        };

        // The scope upstream actually granted overrides the caller's hint
        let granted = read_pin_action_claim(&token.access_token);
        if granted.is_some() && credentials.pin_action.is_some() && granted != credentials.pin_action
        {
            tracing::debug!(
                application_id = %credentials.application_id,
                hinted = ?credentials.pin_action,
                granted = ?granted,
                "PIN scope differs from hint"
            );
        }
        let pin_action = granted.or(credentials.pin_action);

        let record = match self
            .upstream
            .api
            .fetch_application(&base, &token.access_token, &credentials.application_id)
            .await
        {
            Ok(record) => record,
            Err(e) => return denied(self.id(), "application", &e),
        };

        let email = record
            .email()
            .map(str::to_string)
            .unwrap_or_else(|| sentinel_email(&credentials.application_id));
        let id = record.applicant_id().unwrap_or(record.id.as_str()).to_string();

        let mut user = NormalizedUser::new(id, email, UserType::Application, token.access_token);
        user.firstname = record.firstname().unwrap_or_default().to_string();
        user.lastname = record.lastname().unwrap_or_default().to_string();
        user.expires_in = token.expires_in;
        user.application_id = Some(credentials.application_id.clone());
        user.vacancy_id = record.vacancy_id().map(str::to_string);
        user.pin_action = pin_action;

        tracing::info!(
            application_id = %credentials.application_id,
            pin_action = ?pin_action,
            "Application PIN accepted"
        );
        Ok(Some(user))
    }
}

/// All providers, dispatched on the credential variant
#[derive(Clone)]
pub struct SessionProviders {
    pub staff: StaffProvider,
    pub applicant: ApplicantProvider,
    pub pin: PinProvider,
}

impl SessionProviders {
    pub fn new(upstream: UpstreamHandle) -> Self {
        Self {
            staff: StaffProvider::new(upstream.clone()),
            applicant: ApplicantProvider::new(upstream.clone()),
            pin: PinProvider::new(upstream),
        }
    }

    pub async fn authorize(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext<'_>,
    ) -> AuthorizeResult {
        match credentials {
            Credentials::Staff(c) => self.staff.authorize(c, ctx).await,
            Credentials::Nonce(c) => self.applicant.authorize(c, ctx).await,
            Credentials::Pin(c) => self.pin.authorize(c, ctx).await,
        }
    }
}
