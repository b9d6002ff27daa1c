//! JWT signing, validation, and unverified claim inspection

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::claims::SessionToken;
use crate::error::AuthError;
use crate::types::PinAction;

/// Cookie envelope: the session token plus registered JWT claims
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    #[serde(flatten)]
    token: SessionToken,
    iat: i64,
    exp: i64,
}

/// Sign a session token. `exp` mirrors `token.expires`.
pub(crate) fn sign_session_jwt(
    token: &SessionToken,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let claims = SessionClaims {
        token: token.clone(),
        iat: now.timestamp(),
        exp: token.expires,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::SessionEncoding(e.to_string()))
}

/// Validate a session cookie value and return the carried token
pub(crate) fn validate_session_jwt(raw: &str, secret: &str) -> Result<SessionToken, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;
    validation.leeway = 0;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data = decode::<SessionClaims>(raw, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "Session JWT validation failed");
        AuthError::InvalidSession
    })?;

    Ok(token_data.claims.token)
}

#[derive(Debug, Deserialize)]
struct PinScopeClaims {
    #[serde(default, rename = "pinAction")]
    pin_action: Option<String>,
}

/// Read the `pinAction` claim from an upstream-issued access token.
///
/// The token arrives directly from the upstream token endpoint over TLS and
/// this service does not hold its signing key, so only the claims are read.
/// Returns `None` when the token is not a JWT or carries no recognised action.
pub fn read_pin_action_claim(access_token: &str) -> Option<PinAction> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<PinScopeClaims>(access_token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "Access token claims are not readable");
        })
        .ok()?;

    data.claims.pin_action?.parse().ok()
}
