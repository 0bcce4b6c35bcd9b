//! Stateless cookie-based JWT authentication.
//!
//! Dual-token system: short-lived access tokens checked on every request and
//! long-lived refresh tokens used only to mint new access tokens. Neither is
//! stored server-side. The [`jwt_authentication`] middleware renews expired
//! access tokens transparently and publishes a [`Principal`] into the request
//! extensions; [`authorize`] and the [`Auth`] extractor reject downstream.

mod cookie;
mod errors;
mod exclusion;
mod extractors;
mod filter;
mod login;
mod rules;
mod state;
mod status;
mod types;

pub use cookie::{clear_token, format_cookie, get_cookie, read_token, write_token};
pub use errors::AuthError;
pub use exclusion::ExclusionRules;
pub use extractors::{Auth, OptionalAuth};
pub use filter::{FilterOutcome, authenticate, jwt_authentication};
pub use login::{clear_login_cookies, issue_login_cookies};
pub use rules::{AccessRule, AccessRules, Requirement, authorize};
pub use state::AuthState;
pub use status::{InvalidReason, Inspection, TokenStatus, evaluate, inspect};
pub use types::Principal;
