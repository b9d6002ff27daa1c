//! Sign-in credentials
//!
//! Raw form input is turned into one of three validated credential shapes
//! before any provider runs. Input with a missing or blank required field
//! never produces a credential value, so no upstream call can follow.

use std::fmt;
use std::str::FromStr;

use growteam_auth::PinAction;
use growteam_common::mask_secret;
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Sign-in entry point, named by the `/api/auth/callback/{provider}` segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderId {
    /// Staff username and password
    Credentials,
    /// Applicant nonce exchange
    Applicant,
    /// PIN-scoped application access
    Pin,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Credentials => "credentials",
            ProviderId::Applicant => "applicant",
            ProviderId::Pin => "pin",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials" => Ok(ProviderId::Credentials),
            "applicant" => Ok(ProviderId::Applicant),
            "pin" => Ok(ProviderId::Pin),
            other => Err(format!("Unknown sign-in provider: {}", other)),
        }
    }
}

/// Untyped sign-in form as posted by the browser
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInForm {
    pub username: Option<String>,
    pub password: Option<String>,
    pub nonce: Option<String>,
    pub id: Option<String>,
    pub applicant_id: Option<String>,
    pub email: Option<String>,
    pub application_id: Option<String>,
    pub pin: Option<String>,
    pub pin_action: Option<String>,
    pub callback_url: Option<String>,
}

impl fmt::Debug for SignInForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInForm")
            .field("username", &self.username)
            .field("password", &self.password.as_deref().map(mask_secret))
            .field("nonce", &self.nonce.as_deref().map(mask_secret))
            .field("applicant_id", &self.applicant_id.as_ref().or(self.id.as_ref()))
            .field("application_id", &self.application_id)
            .field("pin", &self.pin.as_deref().map(mask_secret))
            .field("pin_action", &self.pin_action)
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

#[derive(Clone, Validate)]
pub struct StaffCredentials {
    #[validate(length(min = 1, max = 320))]
    pub username: String,
    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

#[derive(Clone, Validate)]
#[validate(schema(function = "validate_nonce_identity"))]
pub struct NonceCredentials {
    #[validate(length(min = 1, max = 512))]
    pub nonce: String,
    pub applicant_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

fn validate_nonce_identity(credentials: &NonceCredentials) -> Result<(), ValidationError> {
    if credentials.applicant_id.is_none() && credentials.email.is_none() {
        return Err(ValidationError::new("applicant_id_or_email_required"));
    }
    Ok(())
}

#[derive(Clone, Validate)]
pub struct PinCredentials {
    #[validate(
        length(min = 1, max = 128),
        custom(function = "validate_application_id")
    )]
    pub application_id: String,
    #[validate(length(min = 1, max = 64))]
    pub pin: String,
    /// Caller's hint; the upstream token's own claim takes precedence
    pub pin_action: Option<PinAction>,
}

/// Application ids are echoed into redirect paths and must stay header-safe
pub fn is_safe_application_id(id: &str) -> bool {
    !id.chars().any(|c| c.is_control())
}

fn validate_application_id(id: &str) -> Result<(), ValidationError> {
    if is_safe_application_id(id) {
        Ok(())
    } else {
        Err(ValidationError::new("application_id_control_characters"))
    }
}

impl PinCredentials {
    /// Build from raw fields, returning `None` if anything required is missing
    pub fn parse(
        application_id: Option<&str>,
        pin: Option<&str>,
        pin_action: Option<&str>,
    ) -> Option<Self> {
        let credentials = PinCredentials {
            application_id: present(application_id)?,
            pin: present(pin)?,
            pin_action: present(pin_action).and_then(|a| a.parse().ok()),
        };
        credentials.validate().ok()?;
        Some(credentials)
    }
}

/// Validated credentials, one variant per provider
#[derive(Clone)]
pub enum Credentials {
    Staff(StaffCredentials),
    Nonce(NonceCredentials),
    Pin(PinCredentials),
}

impl Credentials {
    /// Validate a sign-in form for the given provider.
    ///
    /// `None` means the form is incomplete or invalid and the login is denied.
    pub fn from_form(provider: ProviderId, form: &SignInForm) -> Option<Self> {
        match provider {
            ProviderId::Credentials => {
                let credentials = StaffCredentials {
                    username: present(form.username.as_deref())?,
                    password: form.password.clone().filter(|p| !p.is_empty())?,
                };
                credentials.validate().ok()?;
                Some(Credentials::Staff(credentials))
            }
            ProviderId::Applicant => {
                let credentials = NonceCredentials {
                    nonce: present(form.nonce.as_deref())?,
                    applicant_id: present(form.applicant_id.as_deref().or(form.id.as_deref())),
                    email: present(form.email.as_deref()),
                };
                credentials.validate().ok()?;
                Some(Credentials::Nonce(credentials))
            }
            ProviderId::Pin => PinCredentials::parse(
                form.application_id.as_deref(),
                form.pin.as_deref(),
                form.pin_action.as_deref(),
            )
            .map(Credentials::Pin),
        }
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            Credentials::Staff(_) => ProviderId::Credentials,
            Credentials::Nonce(_) => ProviderId::Applicant,
            Credentials::Pin(_) => ProviderId::Pin,
        }
    }
}

fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
