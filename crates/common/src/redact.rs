//! Secret masking for log output
//!
//! Tokens, PINs, nonces, and passwords must never reach the logs in full.
//! Call sites log `mask_secret(value)` instead of the value itself.

/// Longest prefix ever revealed
const MAX_VISIBLE: usize = 4;

/// Mask a secret, keeping a short prefix for correlation.
///
/// At most four characters are kept, and never more than half of the value,
/// so a six digit PIN shows three digits and a two character value shows one.
pub fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    let visible = (len / 2).min(MAX_VISIBLE);
    let prefix: String = value.chars().take(visible).collect();
    format!("{}***", prefix)
}
