//! Issuing and clearing the auth cookie pair.
//!
//! Verifying the caller's password is the host's job. Once it has a
//! [`Principal`], [`issue_login_cookies`] hands out both tokens.

use axum::http::HeaderMap;

use super::cookie::{clear_token, write_token};
use super::state::AuthState;
use super::types::Principal;
use crate::jwt::{JwtError, TokenKind};

/// Sign an access and a refresh token for `principal` and append both cookies
/// to `headers`, access first.
pub fn issue_login_cookies(
    state: &AuthState,
    principal: &Principal,
    now: u64,
    headers: &mut HeaderMap,
) -> Result<(), JwtError> {
    for kind in [TokenKind::Access, TokenKind::Refresh] {
        let issued = state.jwt.sign(principal, kind, now)?;
        write_token(
            headers,
            state.token(kind),
            &state.cookies,
            &issued.token,
            issued.duration,
        );
    }

    tracing::info!(subject = %principal.subject_id, "Issued login tokens");
    Ok(())
}

/// Append deletion instructions for both auth cookies.
pub fn clear_login_cookies(state: &AuthState, headers: &mut HeaderMap) {
    clear_token(headers, &state.access_token, &state.cookies);
    clear_token(headers, &state.refresh_token, &state.cookies);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CookieSettings, ServerConfig, TokenSettings};
    use axum::http::header;

    fn state() -> AuthState {
        AuthState::new(&ServerConfig {
            jwt_secret: b"test-secret-key-for-testing-0123456789".to_vec(),
            access_token: TokenSettings {
                cookie_name: "jwtAccessToken".to_string(),
                validity: 300,
            },
            refresh_token: TokenSettings {
                cookie_name: "jwtRefreshToken".to_string(),
                validity: 3600,
            },
            cookies: CookieSettings::default(),
            exclusions: Vec::new(),
        })
    }

    fn written(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_issue_writes_both_cookies() {
        let state = state();
        let principal = Principal {
            subject_id: "u1".to_string(),
            display_name: "User One".to_string(),
            roles: "ROLE_USER".to_string(),
        };
        let mut headers = HeaderMap::new();

        issue_login_cookies(&state, &principal, 1_000, &mut headers).unwrap();

        let cookies = written(&headers);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("jwtAccessToken="));
        assert!(cookies[0].contains("Max-Age=300"));
        assert!(cookies[1].starts_with("jwtRefreshToken="));
        assert!(cookies[1].contains("Max-Age=3600"));

        let refresh = cookies[1]
            .strip_prefix("jwtRefreshToken=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let claims = state.jwt.decode(refresh, TokenKind::Refresh).unwrap();
        assert_eq!(claims.principal(), principal);
    }

    #[test]
    fn test_clear_writes_both_deletions() {
        let mut headers = HeaderMap::new();
        clear_login_cookies(&state(), &mut headers);

        let cookies = written(&headers);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("jwtAccessToken=;"));
        assert!(cookies[1].starts_with("jwtRefreshToken=;"));
        assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
    }
}
