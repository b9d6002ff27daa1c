//! Identity types shared by providers, the callback pipeline, and the route guard

use serde::{Deserialize, Serialize};

/// Which kind of identity a session represents.
///
/// Exactly one variant is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    /// Employer or recruiter with dashboard access
    Staff,
    /// Applicant with a full cross-application identity
    Applicant,
    /// PIN-scoped identity bound to one application
    Application,
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Staff => write!(f, "staff"),
            UserType::Applicant => write!(f, "applicant"),
            UserType::Application => write!(f, "application"),
        }
    }
}

/// Sub-flow a PIN-scoped session is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinAction {
    Profiling,
    References,
}

impl PinAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinAction::Profiling => "PROFILING",
            PinAction::References => "REFERENCES",
        }
    }
}

impl std::fmt::Display for PinAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PinAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PROFILING" => Ok(PinAction::Profiling),
            "REFERENCES" => Ok(PinAction::References),
            other => Err(format!("Unknown pin action: {}", other)),
        }
    }
}

/// Employer organisation attached to a staff identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// The common shape every session provider produces on a successful login.
#[derive(Clone, PartialEq)]
pub struct NormalizedUser {
    pub id: String,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub user_type: UserType,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub organisations: Vec<Organisation>,
    pub mobile: Option<String>,
    pub linked_in_url: Option<String>,
    pub application_id: Option<String>,
    pub vacancy_id: Option<String>,
    pub pin_action: Option<PinAction>,
}

impl NormalizedUser {
    /// A user with only identity fields set; providers fill in the rest.
    pub fn new(id: String, email: String, user_type: UserType, access_token: String) -> Self {
        Self {
            id,
            email,
            firstname: String::new(),
            lastname: String::new(),
            user_type,
            access_token,
            refresh_token: None,
            expires_in: None,
            organisations: Vec::new(),
            mobile: None,
            linked_in_url: None,
            application_id: None,
            vacancy_id: None,
            pin_action: None,
        }
    }
}

impl std::fmt::Debug for NormalizedUser {
    #[mutants::skip] // Field listing only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizedUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_in", &self.expires_in)
            .field("organisations", &self.organisations.len())
            .field("application_id", &self.application_id)
            .field("vacancy_id", &self.vacancy_id)
            .field("pin_action", &self.pin_action)
            .finish()
    }
}

/// Domain used for placeholder addresses of PIN sessions without an email.
///
/// `.invalid` is reserved (RFC 2606) and can never receive mail.
pub const SENTINEL_EMAIL_DOMAIN: &str = "applications.invalid";

/// Placeholder address for an application whose upstream record has no email
pub fn sentinel_email(application_id: &str) -> String {
    format!("application-{}@{}", application_id, SENTINEL_EMAIL_DOMAIN)
}

/// True for addresses produced by [`sentinel_email`]; outbound mail must skip these.
pub fn is_sentinel_email(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.eq_ignore_ascii_case(SENTINEL_EMAIL_DOMAIN))
        .unwrap_or(false)
}
