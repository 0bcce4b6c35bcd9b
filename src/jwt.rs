//! JWT token signing and decoding.
//!
//! Expiry is not checked here: `decode` only proves that a token
//! was signed with our secret for the expected kind. Whether it is still
//! usable is decided by [`crate::auth::evaluate`].

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::auth::Principal;

/// Token type for distinguishing access vs refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token checked on every request
    Access,
    /// Long-lived token only used to mint new access tokens
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims shared by both token kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Display name
    pub name: String,
    /// Comma-separated roles
    pub roles: String,
    /// Token kind
    #[serde(rename = "typ")]
    pub token_kind: TokenKind,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    /// The identity carried by these claims.
    pub fn principal(&self) -> Principal {
        Principal {
            subject_id: self.sub.clone(),
            display_name: self.name.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Result of signing a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// The claims that were signed
    pub claims: Claims,
    /// Token lifetime in seconds, also used as the cookie Max-Age
    pub duration: u64,
}

/// Signing keys plus the validity of each token kind.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_validity: u64,
    refresh_validity: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and lifetimes (seconds).
    pub fn new(secret: &[u8], access_validity: u64, refresh_validity: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_validity,
            refresh_validity,
        }
    }

    /// Lifetime in seconds of tokens of the given kind.
    pub fn validity(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.access_validity,
            TokenKind::Refresh => self.refresh_validity,
        }
    }

    /// Sign a fresh token of `kind` for `principal`, issued at `now`.
    pub fn sign(
        &self,
        principal: &Principal,
        kind: TokenKind,
        now: u64,
    ) -> Result<IssuedToken, JwtError> {
        let duration = self.validity(kind);

        let claims = Claims {
            sub: principal.subject_id.clone(),
            name: principal.display_name.clone(),
            roles: principal.roles.clone(),
            token_kind: kind,
            iat: now,
            exp: now.saturating_add(duration),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            claims,
            duration,
        })
    }

    /// Verify the signature of `token` and decode its claims.
    /// Fails if the token was issued for a different kind.
    pub fn decode(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(JwtError::Decoding)?;

        if token_data.claims.token_kind != kind {
            return Err(JwtError::WrongTokenKind);
        }

        Ok(token_data.claims)
    }
}

/// Current Unix time in seconds.
pub fn unix_now() -> Result<u64, JwtError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| JwtError::TimeError)?
        .as_secs())
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding the token
    Decoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
    /// Wrong token kind (e.g., using refresh token as access token)
    WrongTokenKind,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
            JwtError::WrongTokenKind => write!(f, "Wrong token kind"),
        }
    }
}

impl std::error::Error for JwtError {}
