//! CLI argument parsing, validation, and startup helpers.

use clap::Parser;

use crate::config::{
    ConfigError, CookieSettings, DEFAULT_EXCLUSIONS, SameSite, ServerConfig, TokenSettings,
    cookie_name_key, validity_key,
};
use crate::jwt::TokenKind;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tokengate",
    about = "Stateless cookie-based JWT authentication with silent token renewal"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Name of the access token cookie
    #[arg(long, env = "ACCESS_TOKEN_NAME")]
    pub access_token_name: Option<String>,

    /// Access token validity in seconds
    #[arg(long, env = "ACCESS_TOKEN_VALIDITY")]
    pub access_token_validity: Option<u64>,

    /// Name of the refresh token cookie
    #[arg(long, env = "REFRESH_TOKEN_NAME")]
    pub refresh_token_name: Option<String>,

    /// Refresh token validity in seconds
    #[arg(long, env = "REFRESH_TOKEN_VALIDITY")]
    pub refresh_token_validity: Option<u64>,

    /// Domain attribute for auth cookies (host-only when unset)
    #[arg(long, env = "COOKIE_DOMAIN")]
    pub cookie_domain: Option<String>,

    /// Set the Secure flag on auth cookies (use behind HTTPS)
    #[arg(long)]
    pub secure_cookies: bool,

    /// SameSite attribute for auth cookies
    #[arg(long, value_enum, default_value = "lax")]
    pub same_site: SameSite,

    /// Path pattern that bypasses authentication, repeatable. Replaces the built-in list
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclusions: Vec<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Result<Vec<u8>, ConfigError> {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're at startup before any request handling,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        return Ok(secret.into_bytes());
    }

    match jwt_secret_file {
        Some(path) => std::fs::read_to_string(path)
            .map(|content| content.trim().as_bytes().to_vec())
            .map_err(|e| ConfigError::SecretFile {
                path: path.to_string(),
                error: e.to_string(),
            }),
        None => Err(ConfigError::Missing("JWT_SECRET")),
    }
}

fn required_name(value: &Option<String>, kind: TokenKind) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ConfigError::Missing(cookie_name_key(kind))),
    }
}

fn required_validity(value: Option<u64>, kind: TokenKind) -> Result<u64, ConfigError> {
    value.ok_or(ConfigError::Missing(validity_key(kind)))
}

fn cookie_domain(value: &Option<String>) -> Result<Option<String>, ConfigError> {
    let Some(domain) = value.as_deref().map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };

    let valid = domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        return Err(ConfigError::Invalid {
            key: "COOKIE_DOMAIN",
            value: domain.to_string(),
        });
    }

    Ok(Some(domain.to_string()))
}

/// Build and validate the server configuration from arguments and the loaded secret.
pub fn build_config(args: &Args, jwt_secret: Vec<u8>) -> Result<ServerConfig, ConfigError> {
    let exclusions = if args.exclusions.is_empty() {
        DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect()
    } else {
        args.exclusions.clone()
    };

    let config = ServerConfig {
        jwt_secret,
        access_token: TokenSettings {
            cookie_name: required_name(&args.access_token_name, TokenKind::Access)?,
            validity: required_validity(args.access_token_validity, TokenKind::Access)?,
        },
        refresh_token: TokenSettings {
            cookie_name: required_name(&args.refresh_token_name, TokenKind::Refresh)?,
            validity: required_validity(args.refresh_token_validity, TokenKind::Refresh)?,
        },
        cookies: CookieSettings {
            domain: cookie_domain(&args.cookie_domain)?,
            secure: args.secure_cookies,
            same_site: args.same_site,
        },
        exclusions,
    };

    config.validate()?;
    Ok(config)
}
