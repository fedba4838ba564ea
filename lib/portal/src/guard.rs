//! The authorization guard.
//!
//! `decide` is a pure function of the session snapshot and the rule. It
//! is re-evaluated on every render of a guarded boundary and never caches
//! a decision across identity changes.

use serde::{Deserialize, Serialize};

use lyceum_session::{Portal, Role, SessionSnapshot};

/// Declarative authorization requirements attached to a route or
/// navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Roles allowed through, when restricted.
    #[serde(default)]
    required_roles: Option<Vec<Role>>,
    /// Permission string the identity must hold, when restricted.
    #[serde(default)]
    required_permission: Option<String>,
}

impl RouteRule {
    /// A rule satisfied by any authenticated identity.
    #[must_use]
    pub fn any_authenticated() -> Self {
        Self::default()
    }

    /// A rule restricted to the given roles.
    #[must_use]
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            required_roles: Some(roles.into_iter().collect()),
            required_permission: None,
        }
    }

    /// Additionally requires a permission string.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    /// Returns the allowed roles, if restricted.
    #[must_use]
    pub fn required_roles(&self) -> Option<&[Role]> {
        self.required_roles.as_deref()
    }

    /// Returns the required permission, if any.
    #[must_use]
    pub fn required_permission(&self) -> Option<&str> {
        self.required_permission.as_deref()
    }
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The boot probe is still outstanding; render a neutral loading
    /// state. A wait state, not a decision.
    Pending,
    /// Render the route.
    Allow,
    /// Nobody is signed in; navigate to the login screen.
    RedirectLogin,
    /// Signed in but not authorized here; navigate to the home of the
    /// identity's own portal.
    RedirectHome(Portal),
}

/// Decides whether the current session may enter a guarded route.
#[must_use]
pub fn decide(session: &SessionSnapshot, rule: &RouteRule) -> GuardOutcome {
    if session.is_loading() {
        return GuardOutcome::Pending;
    }

    let Some(identity) = session.identity() else {
        return GuardOutcome::RedirectLogin;
    };

    if let Some(roles) = rule.required_roles() {
        if !roles.contains(&identity.role()) {
            return GuardOutcome::RedirectHome(identity.portal());
        }
    }

    if let Some(permission) = rule.required_permission() {
        if !identity.has_permission(permission) {
            return GuardOutcome::RedirectHome(identity.portal());
        }
    }

    GuardOutcome::Allow
}
