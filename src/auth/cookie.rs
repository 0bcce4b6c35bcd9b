//! Reading auth cookies from requests and writing them to responses.

use axum::http::{HeaderMap, HeaderValue, header};

use crate::config::{CookieSettings, TokenSettings};

/// Extract a cookie value from the Cookie header.
/// Looks through every `Cookie` header, not just the first.
pub fn get_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookie_header| cookie_header.split(';'))
        .find_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim())
        })
}

/// Read the token cookie described by `token`; absence yields an empty string.
pub fn read_token<'a>(headers: &'a HeaderMap, token: &TokenSettings) -> &'a str {
    get_cookie(headers, &token.cookie_name).unwrap_or("")
}

/// Format a `Set-Cookie` value for an auth cookie.
pub fn format_cookie(
    token: &TokenSettings,
    cookies: &CookieSettings,
    value: &str,
    max_age: u64,
) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite={}; Path=/",
        token.cookie_name,
        value,
        cookies.same_site.as_str()
    );
    if let Some(domain) = &cookies.domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    cookie.push_str(&format!("; Max-Age={}", max_age));
    if cookies.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Append a `Set-Cookie` header. Never replaces earlier `Set-Cookie` values.
pub fn write_token(
    headers: &mut HeaderMap,
    token: &TokenSettings,
    cookies: &CookieSettings,
    value: &str,
    max_age: u64,
) {
    let cookie = format_cookie(token, cookies, value, max_age);
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(e) => {
            tracing::error!(cookie = %token.cookie_name, error = %e, "Refusing to write malformed cookie");
        }
    }
}

/// Append a `Set-Cookie` that deletes the cookie (empty value, Max-Age=0).
pub fn clear_token(headers: &mut HeaderMap, token: &TokenSettings, cookies: &CookieSettings) {
    write_token(headers, token, cookies, "", 0);
}
