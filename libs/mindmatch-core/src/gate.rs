//! Route access policy for the authentication gate.
//!
//! The identity lookup itself lives with the host; this module only decides
//! what a lookup result means for a given path. Protected routes fail closed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where a path sits with respect to authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Requires a signed-in player.
    Protected,
    /// Login and registration; signed-in players are sent onward.
    GuestOnly,
    Public,
}

/// Result of resolving the caller's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLookup<I> {
    Present(I),
    Absent,
    /// Lookup kept failing after every retry.
    Unavailable,
}

/// What the gate tells the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision<I> {
    Allow(Option<I>),
    RedirectToLogin,
    RedirectToLanding,
}

/// Retry and redirect settings shared by every route boundary.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub login_path: String,
    pub landing_path: String,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

impl GatePolicy {
    /// Redirect target for a decision, if it is a redirect.
    pub fn location<I>(&self, decision: &AccessDecision<I>) -> Option<&str> {
        match decision {
            AccessDecision::Allow(_) => None,
            AccessDecision::RedirectToLogin => Some(self.login_path.as_str()),
            AccessDecision::RedirectToLanding => Some(self.landing_path.as_str()),
        }
    }
}

/// Classify a request path.
pub fn classify_route(path: &str) -> RouteKind {
    let is_under = |prefix: &str| {
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    };

    if path.starts_with("/_next") || path.starts_with("/api") || path.contains('.') {
        return RouteKind::Public;
    }
    if is_under("/dashboard") {
        return RouteKind::Protected;
    }
    if is_under("/login") || is_under("/register") {
        return RouteKind::GuestOnly;
    }
    RouteKind::Public
}

/// Decide access for a route given the identity lookup result.
pub fn decide<I>(route: RouteKind, lookup: IdentityLookup<I>) -> AccessDecision<I> {
    match (route, lookup) {
        (RouteKind::Protected, IdentityLookup::Present(identity)) => {
            AccessDecision::Allow(Some(identity))
        }
        (RouteKind::Protected, _) => AccessDecision::RedirectToLogin,
        (RouteKind::GuestOnly, IdentityLookup::Present(_)) => AccessDecision::RedirectToLanding,
        (_, IdentityLookup::Present(identity)) => AccessDecision::Allow(Some(identity)),
        (_, _) => AccessDecision::Allow(None),
    }
}
