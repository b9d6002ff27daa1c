//! Session token and client session shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Organisation, PinAction, UserType};

/// Server-side session token.
///
/// Carried inside the signed session cookie and never handed to client code
/// as-is; see [`ClientSession`] for the projected subset.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Absolute expiry in unix seconds
    pub expires: i64,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organisations: Vec<Organisation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_in_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacancy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_action: Option<PinAction>,
}

impl std::fmt::Debug for SessionToken {
    #[mutants::skip] // Field listing only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("expires", &self.expires)
            .field("application_id", &self.application_id)
            .field("pin_action", &self.pin_action)
            .finish()
    }
}

/// Public-safe user fields exposed to the browser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_in_url: Option<String>,
}

/// Client-visible session.
///
/// Must never gain a field that carries an upstream credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSession {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}
