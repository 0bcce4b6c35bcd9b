//! Shared authentication state.

use crate::config::{CookieSettings, ServerConfig, TokenSettings};
use crate::jwt::{JwtConfig, TokenKind};

use super::exclusion::ExclusionRules;

/// Everything the filter needs, built once from [`ServerConfig`] and shared
/// read-only (behind an `Arc`) by all requests.
#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtConfig,
    pub access_token: TokenSettings,
    pub refresh_token: TokenSettings,
    pub cookies: CookieSettings,
    pub exclusions: ExclusionRules,
}

impl AuthState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            jwt: JwtConfig::new(
                &config.jwt_secret,
                config.access_token.validity,
                config.refresh_token.validity,
            ),
            access_token: config.access_token.clone(),
            refresh_token: config.refresh_token.clone(),
            cookies: config.cookies.clone(),
            exclusions: ExclusionRules::new(config.exclusions.iter().cloned()),
        }
    }

    /// Cookie settings for the given token kind.
    pub fn token(&self, kind: TokenKind) -> &TokenSettings {
        match kind {
            TokenKind::Access => &self.access_token,
            TokenKind::Refresh => &self.refresh_token,
        }
    }
}
