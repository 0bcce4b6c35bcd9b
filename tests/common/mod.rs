#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use tokengate::{
    ServerConfig, create_app,
    auth::Principal,
    config::{CookieSettings, DEFAULT_EXCLUSIONS, TokenSettings},
    jwt::{JwtConfig, TokenKind, unix_now},
};

pub const SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough!!";
pub const ACCESS_COOKIE: &str = "jwtAccessToken";
pub const REFRESH_COOKIE: &str = "jwtRefreshToken";
pub const ACCESS_VALIDITY: u64 = 300;
pub const REFRESH_VALIDITY: u64 = 3600;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: SECRET.to_vec(),
        access_token: TokenSettings {
            cookie_name: ACCESS_COOKIE.to_string(),
            validity: ACCESS_VALIDITY,
        },
        refresh_token: TokenSettings {
            cookie_name: REFRESH_COOKIE.to_string(),
            validity: REFRESH_VALIDITY,
        },
        cookies: CookieSettings::default(),
        exclusions: DEFAULT_EXCLUSIONS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Create a test app and a codec sharing its secret.
pub fn create_test_app() -> (Router, JwtConfig) {
    let config = test_config();
    let jwt = JwtConfig::new(SECRET, ACCESS_VALIDITY, REFRESH_VALIDITY);
    (create_app(&config), jwt)
}

pub fn user(subject: &str, roles: &str) -> Principal {
    Principal {
        subject_id: subject.to_string(),
        display_name: format!("{} name", subject),
        roles: roles.to_string(),
    }
}

pub fn now() -> u64 {
    unix_now().unwrap()
}

/// A token issued just now.
pub fn valid_token(jwt: &JwtConfig, principal: &Principal, kind: TokenKind) -> String {
    jwt.sign(principal, kind, now()).unwrap().token
}

/// A token whose lifetime ended ten seconds ago.
pub fn expired_token(jwt: &JwtConfig, principal: &Principal, kind: TokenKind) -> String {
    let issued_at = now() - jwt.validity(kind) - 10;
    jwt.sign(principal, kind, issued_at).unwrap().token
}

pub fn cookie_header(access: Option<&str>, refresh: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(access) = access {
        parts.push(format!("{}={}", ACCESS_COOKIE, access));
    }
    if let Some(refresh) = refresh {
        parts.push(format!("{}={}", REFRESH_COOKIE, refresh));
    }
    parts.join("; ")
}

pub fn request(method: &str, uri: &str, cookies: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header("cookie", cookies);
    }
    builder.body(Body::empty()).unwrap()
}

/// Extract Set-Cookie headers from response
pub fn extract_set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .collect()
}

/// Value of a `Set-Cookie` line if it sets `name`.
pub fn cookie_value<'a>(set_cookie: &'a str, name: &str) -> Option<&'a str> {
    let (key, rest) = set_cookie.split_once('=')?;
    (key == name).then(|| rest.split(';').next().unwrap_or(""))
}

/// Check if cookies contain `name` being cleared (Max-Age=0)
pub fn is_cleared(set_cookie: &str, name: &str) -> bool {
    cookie_value(set_cookie, name) == Some("") && set_cookie.contains("Max-Age=0")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
