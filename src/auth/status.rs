//! Token status evaluation.

use crate::jwt::{Claims, JwtConfig, TokenKind};

/// Validity of a presented token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Signature verifies and the token has not expired
    Valid,
    /// Signature verifies but `exp` has passed
    Expired,
    /// Missing, malformed, forged, or of the wrong kind
    Invalid,
}

/// Why a token was classified as [`TokenStatus::Invalid`].
/// Only used for logging; callers treat every reason the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// No cookie, or an empty one
    Missing,
    /// Present but failed verification
    Rejected,
}

/// Outcome of inspecting a token, carrying the decoded claims when the
/// signature verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Valid(Claims),
    Expired(Claims),
    Invalid(InvalidReason),
}

impl Inspection {
    pub fn status(&self) -> TokenStatus {
        match self {
            Inspection::Valid(_) => TokenStatus::Valid,
            Inspection::Expired(_) => TokenStatus::Expired,
            Inspection::Invalid(_) => TokenStatus::Invalid,
        }
    }
}

/// Decode `token` as `kind` and compare its expiry with `now`.
pub fn inspect(jwt: &JwtConfig, token: &str, kind: TokenKind, now: u64) -> Inspection {
    if token.is_empty() {
        return Inspection::Invalid(InvalidReason::Missing);
    }

    match jwt.decode(token, kind) {
        Ok(claims) if claims.exp > now => Inspection::Valid(claims),
        Ok(claims) => Inspection::Expired(claims),
        Err(e) => {
            tracing::debug!(kind = %kind, error = %e, "Token failed verification");
            Inspection::Invalid(InvalidReason::Rejected)
        }
    }
}

/// Classify `token` as valid, expired or invalid at `now`.
pub fn evaluate(jwt: &JwtConfig, token: &str, kind: TokenKind, now: u64) -> TokenStatus {
    inspect(jwt, token, kind, now).status()
}
