//! Per-request authentication filter.
//!
//! Runs in front of every route. It never rejects a request: it either
//! publishes a [`Principal`] into the request extensions or leaves them
//! untouched, and the request always continues down the stack. Rejecting
//! unauthenticated callers is the job of [`super::authorize`] and the
//! [`super::Auth`] extractor.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, info};

use super::cookie::{clear_token, read_token, write_token};
use super::state::AuthState;
use super::status::{Inspection, TokenStatus, inspect};
use super::types::Principal;
use crate::jwt::{Claims, JwtError, TokenKind, unix_now};

/// What the filter decided for one request.
#[derive(Debug)]
pub enum FilterOutcome {
    /// Path matched an exclusion rule; no cookie was looked at
    Bypassed,
    /// The access token was valid
    Authenticated(Principal),
    /// A new access token was minted from a valid refresh token.
    /// `set_cookies` holds the clear instruction followed by the new cookie.
    Renewed {
        principal: Principal,
        set_cookies: HeaderMap,
    },
    /// Neither token authenticates the caller
    Unauthenticated {
        access: TokenStatus,
        refresh: TokenStatus,
    },
}

impl FilterOutcome {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            FilterOutcome::Authenticated(principal)
            | FilterOutcome::Renewed { principal, .. } => Some(principal),
            FilterOutcome::Bypassed | FilterOutcome::Unauthenticated { .. } => None,
        }
    }
}

/// Run the access/refresh state machine for a request to `path` at `now`.
pub fn authenticate(
    state: &AuthState,
    path: &str,
    headers: &HeaderMap,
    now: u64,
) -> FilterOutcome {
    if !state.exclusions.should_intercept(path) {
        return FilterOutcome::Bypassed;
    }

    let access_token = read_token(headers, &state.access_token);
    let access = match inspect(&state.jwt, access_token, TokenKind::Access, now) {
        Inspection::Valid(claims) => {
            debug!(path = %path, subject = %claims.sub, "Access token valid");
            return FilterOutcome::Authenticated(claims.principal());
        }
        Inspection::Expired(claims) => {
            debug!(path = %path, subject = %claims.sub, "Access token expired");
            TokenStatus::Expired
        }
        Inspection::Invalid(reason) => {
            debug!(path = %path, reason = ?reason, "Access token invalid");
            TokenStatus::Invalid
        }
    };

    let refresh_token = read_token(headers, &state.refresh_token);
    match inspect(&state.jwt, refresh_token, TokenKind::Refresh, now) {
        Inspection::Valid(claims) => match renew(state, &claims, now) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(subject = %claims.sub, error = %e, "Failed to renew access token");
                FilterOutcome::Unauthenticated {
                    access,
                    refresh: TokenStatus::Valid,
                }
            }
        },
        Inspection::Expired(claims) => {
            debug!(path = %path, subject = %claims.sub, "Refresh token expired");
            FilterOutcome::Unauthenticated {
                access,
                refresh: TokenStatus::Expired,
            }
        }
        Inspection::Invalid(reason) => {
            debug!(path = %path, reason = ?reason, "Refresh token invalid");
            FilterOutcome::Unauthenticated {
                access,
                refresh: TokenStatus::Invalid,
            }
        }
    }
}

/// Mint a new access token carrying the refresh token's identity.
fn renew(state: &AuthState, refresh: &Claims, now: u64) -> Result<FilterOutcome, JwtError> {
    let issued = state
        .jwt
        .sign(&refresh.principal(), TokenKind::Access, now)?;

    // Clear first, then set: both instructions for the same name in one response.
    let mut set_cookies = HeaderMap::new();
    clear_token(&mut set_cookies, &state.access_token, &state.cookies);
    write_token(
        &mut set_cookies,
        &state.access_token,
        &state.cookies,
        &issued.token,
        issued.duration,
    );

    info!(subject = %issued.claims.sub, "Renewed access token from refresh token");

    Ok(FilterOutcome::Renewed {
        principal: issued.claims.principal(),
        set_cookies,
    })
}

/// Middleware wrapping [`authenticate`].
///
/// Renewal cookies are placed before any `Set-Cookie` the inner handler
/// wrote, so a handler instruction for the same cookie (e.g. logout) wins.
pub async fn jwt_authentication(
    State(state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match unix_now() {
        Ok(now) => authenticate(&state, request.uri().path(), request.headers(), now),
        Err(e) => {
            error!(error = %e, "Cannot read clock, request continues unauthenticated");
            FilterOutcome::Unauthenticated {
                access: TokenStatus::Invalid,
                refresh: TokenStatus::Invalid,
            }
        }
    };

    if let Some(principal) = outcome.principal() {
        request.extensions_mut().insert(principal.clone());
    }

    let mut response = next.run(request).await;

    if let FilterOutcome::Renewed { set_cookies, .. } = outcome {
        prepend_set_cookies(response.headers_mut(), &set_cookies);
    }

    response
}

fn prepend_set_cookies(headers: &mut HeaderMap, first: &HeaderMap) {
    let downstream: Vec<HeaderValue> = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .cloned()
        .collect();
    headers.remove(header::SET_COOKIE);

    for value in first.get_all(header::SET_COOKIE) {
        headers.append(header::SET_COOKIE, value.clone());
    }
    for value in downstream {
        headers.append(header::SET_COOKIE, value);
    }
}
