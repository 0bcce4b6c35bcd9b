//! Path-based authorization, evaluated after the filter has run.
//!
//! Rules are checked in order and the first matching prefix decides.
//! Paths matching no rule are permitted.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::errors::AuthError;
use super::types::Principal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    PermitAll,
    Authenticated,
    /// Any one of these roles
    AnyRole(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub prefix: String,
    pub requirement: Requirement,
}

#[derive(Debug, Clone, Default)]
pub struct AccessRules {
    rules: Vec<AccessRule>,
}

impl AccessRules {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// The rule table of the bundled service.
    pub fn default_rules() -> Self {
        let rule = |prefix: &str, requirement| AccessRule {
            prefix: prefix.to_string(),
            requirement,
        };
        Self::new(vec![
            // Logout must work for callers whose session already lapsed
            rule("/user/v1/logout", Requirement::PermitAll),
            rule(
                "/notice/v1/",
                Requirement::AnyRole(vec!["ROLE_USER".to_string()]),
            ),
            rule("/user/v1/", Requirement::Authenticated),
            rule("/html/user/", Requirement::Authenticated),
            rule(
                "/admin/",
                Requirement::AnyRole(vec!["ROLE_ADMIN".to_string()]),
            ),
        ])
    }

    /// Requirement applying to `path`.
    pub fn requirement(&self, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| path.starts_with(rule.prefix.as_str()))
            .map(|rule| &rule.requirement)
            .unwrap_or(&Requirement::PermitAll)
    }

    pub fn check(&self, path: &str, principal: Option<&Principal>) -> Result<(), AuthError> {
        match (self.requirement(path), principal) {
            (Requirement::PermitAll, _) => Ok(()),
            (_, None) => Err(AuthError::NotAuthenticated),
            (Requirement::Authenticated, Some(_)) => Ok(()),
            (Requirement::AnyRole(roles), Some(principal)) => {
                if roles.iter().any(|role| principal.has_role(role)) {
                    Ok(())
                } else {
                    Err(AuthError::InsufficientRole)
                }
            }
        }
    }
}

/// Middleware enforcing [`AccessRules`]. Must sit inside the filter layer.
pub async fn authorize(
    State(rules): State<Arc<AccessRules>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    match rules.check(path, request.extensions().get::<Principal>()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            tracing::debug!(path = %path, error = %e, "Request denied");
            e.into_response()
        }
    }
}
