//! Authentication user types.

use serde::{Deserialize, Serialize};

/// Identity published for the duration of one request.
///
/// Only ever built from the claims of a valid access token, either the one the
/// caller presented or one minted during silent renewal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Subject (user id)
    pub subject_id: String,
    pub display_name: String,
    /// Comma-separated roles, e.g. `ROLE_USER,ROLE_ADMIN`
    pub roles: String,
}

impl Principal {
    /// Individual roles, trimmed, empty entries skipped.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles().any(|r| r == role)
    }
}
