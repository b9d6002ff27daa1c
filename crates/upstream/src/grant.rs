//! Grant types and the token they exchange for

use growteam_auth::PinAction;
use growteam_common::mask_secret;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Legacy token endpoint, used for staff password grants
pub const LEGACY_TOKEN_PATH: &str = "/auth/token";

/// Versioned token endpoint for nonce and PIN grants
pub const TOKEN_PATH: &str = "/v1/auth/token";

/// A credential to trade for a bearer token
#[derive(Clone, PartialEq, Eq)]
pub enum Grant {
    /// Staff username and password
    Password { username: String, password: String },
    /// One-time nonce issued after an anonymous upload
    Nonce {
        applicant_id: Option<String>,
        email: Option<String>,
        nonce: String,
    },
    /// Per-application PIN, optionally hinting the sub-flow
    Pin {
        application_id: String,
        pin: String,
        pin_action: Option<PinAction>,
    },
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::Password { .. } => "password",
            Grant::Nonce { .. } => "custom:nonce",
            Grant::Pin { .. } => "custom:pin",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Grant::Password { .. } => LEGACY_TOKEN_PATH,
            Grant::Nonce { .. } | Grant::Pin { .. } => TOKEN_PATH,
        }
    }

    /// JSON body `{ grant_type, ...params }`
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("grant_type".to_string(), json!(self.grant_type()));

        match self {
            Grant::Password { username, password } => {
                body.insert("username".to_string(), json!(username));
                body.insert("password".to_string(), json!(password));
            }
            Grant::Nonce {
                applicant_id,
                email,
                nonce,
            } => {
                body.insert("nonce".to_string(), json!(nonce));
                // Upstream accepts either key depending on version
                if let Some(id) = applicant_id {
                    body.insert("applicantId".to_string(), json!(id));
                    body.insert("id".to_string(), json!(id));
                }
                if let Some(email) = email {
                    body.insert("email".to_string(), json!(email));
                }
            }
            Grant::Pin {
                application_id,
                pin,
                pin_action,
            } => {
                body.insert("applicationId".to_string(), json!(application_id));
                body.insert("pin".to_string(), json!(pin));
                if let Some(action) = pin_action {
                    body.insert("pinAction".to_string(), json!(action));
                }
            }
        }

        Value::Object(body)
    }

    /// Who the grant is for, safe to log
    pub fn subject(&self) -> String {
        match self {
            Grant::Password { username, .. } => mask_secret(username),
            Grant::Nonce {
                applicant_id,
                email,
                ..
            } => applicant_id
                .as_deref()
                .or(email.as_deref())
                .map(mask_secret)
                .unwrap_or_default(),
            Grant::Pin { application_id, .. } => application_id.clone(),
        }
    }

    /// The secret half of the grant, masked
    pub fn masked_secret(&self) -> String {
        match self {
            Grant::Password { password, .. } => mask_secret(password),
            Grant::Nonce { nonce, .. } => mask_secret(nonce),
            Grant::Pin { pin, .. } => mask_secret(pin),
        }
    }
}

impl std::fmt::Debug for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grant")
            .field("grant_type", &self.grant_type())
            .field("subject", &self.subject())
            .field("secret", &self.masked_secret())
            .finish()
    }
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Upstream grant response
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &mask_secret(&self.access_token))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
