//! Authentication configuration, resolved once at startup.
//!
//! Everything here is immutable after [`ServerConfig::validate`] succeeds and
//! is shared read-only by every request.

use crate::jwt::TokenKind;

/// Minimum accepted length of the signing secret, in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Paths that bypass the authentication filter entirely.
/// A request is excluded when its path contains any of these.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "/css/",
    "/js/",
    "/html/index.html",
    "/html/ss/",
    "/login/v1/",
    "/reg/v1",
    "/favicon.ico",
];

/// Cookie name and lifetime for one token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub cookie_name: String,
    /// Validity in seconds; used for both the `exp` claim and the cookie Max-Age
    pub validity: u64,
}

/// `SameSite` attribute written on auth cookies.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes shared by both auth cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSettings {
    /// `Domain` attribute; omitted when `None` (host-only cookie)
    pub domain: Option<String>,
    /// Whether to set the `Secure` flag (should be true behind HTTPS)
    pub secure: bool,
    pub same_site: SameSite,
}

pub struct ServerConfig {
    /// Secret for signing tokens
    pub jwt_secret: Vec<u8>,
    pub access_token: TokenSettings,
    pub refresh_token: TokenSettings,
    pub cookies: CookieSettings,
    /// Substring patterns for paths that skip authentication
    pub exclusions: Vec<String>,
}

impl ServerConfig {
    /// Settings for the given token kind.
    pub fn token(&self, kind: TokenKind) -> &TokenSettings {
        match kind {
            TokenKind::Access => &self.access_token,
            TokenKind::Refresh => &self.refresh_token,
        }
    }

    /// Check the configuration for mistakes that would make authentication unsound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort(self.jwt_secret.len()));
        }

        for kind in [TokenKind::Access, TokenKind::Refresh] {
            let settings = self.token(kind);
            if settings.cookie_name.is_empty() {
                return Err(ConfigError::Missing(cookie_name_key(kind)));
            }
            if !is_cookie_token(&settings.cookie_name) {
                return Err(ConfigError::InvalidCookieName(settings.cookie_name.clone()));
            }
            if settings.validity == 0 {
                return Err(ConfigError::ZeroValidity(kind));
            }
        }

        if self.access_token.cookie_name == self.refresh_token.cookie_name {
            return Err(ConfigError::SameCookieName(
                self.access_token.cookie_name.clone(),
            ));
        }

        if self.access_token.validity >= self.refresh_token.validity {
            return Err(ConfigError::AccessOutlivesRefresh {
                access: self.access_token.validity,
                refresh: self.refresh_token.validity,
            });
        }

        if self.cookies.same_site == SameSite::None && !self.cookies.secure {
            return Err(ConfigError::InsecureSameSiteNone);
        }

        Ok(())
    }
}

/// Name of the configuration key holding the cookie name for `kind`.
pub fn cookie_name_key(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Access => "ACCESS_TOKEN_NAME",
        TokenKind::Refresh => "REFRESH_TOKEN_NAME",
    }
}

/// Name of the configuration key holding the validity for `kind`.
pub fn validity_key(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Access => "ACCESS_TOKEN_VALIDITY",
        TokenKind::Refresh => "REFRESH_TOKEN_VALIDITY",
    }
}

// RFC 6265 cookie-name: any CHAR except CTLs, spaces and separators.
fn is_cookie_token(name: &str) -> bool {
    name.bytes().all(|b| {
        b.is_ascii_graphic()
            && !matches!(
                b,
                b'(' | b')'
                    | b'<'
                    | b'>'
                    | b'@'
                    | b','
                    | b';'
                    | b':'
                    | b'\\'
                    | b'"'
                    | b'/'
                    | b'['
                    | b']'
                    | b'?'
                    | b'='
                    | b'{'
                    | b'}'
            )
    })
}

/// Startup configuration errors. All of these are fatal.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided
    Missing(&'static str),
    /// A setting was provided but could not be parsed
    Invalid { key: &'static str, value: String },
    /// The secret file could not be read
    SecretFile { path: String, error: String },
    SecretTooShort(usize),
    InvalidCookieName(String),
    SameCookieName(String),
    ZeroValidity(TokenKind),
    AccessOutlivesRefresh { access: u64, refresh: u64 },
    InsecureSameSiteNone,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} is required", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
            ConfigError::SecretFile { path, error } => {
                write!(f, "Failed to read JWT secret file {}: {}", path, error)
            }
            ConfigError::SecretTooShort(len) => write!(
                f,
                "JWT secret is {} bytes, at least {} are required",
                len, MIN_JWT_SECRET_LENGTH
            ),
            ConfigError::InvalidCookieName(name) => {
                write!(f, "Invalid cookie name: {:?}", name)
            }
            ConfigError::SameCookieName(name) => write!(
                f,
                "Access and refresh tokens cannot share the cookie name {:?}",
                name
            ),
            ConfigError::ZeroValidity(kind) => {
                write!(f, "{} must be greater than zero", validity_key(*kind))
            }
            ConfigError::AccessOutlivesRefresh { access, refresh } => write!(
                f,
                "Access token validity ({}s) must be shorter than refresh token validity ({}s)",
                access, refresh
            ),
            ConfigError::InsecureSameSiteNone => {
                write!(f, "SameSite=None requires secure cookies")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
