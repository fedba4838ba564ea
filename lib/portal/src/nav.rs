//! Permission-filtered navigation entries.
//!
//! A menu is a sequence of entries, each optionally gated by a
//! permission string. Filtering happens at render time against the
//! current snapshot, so an identity that loses a permission server-side
//! stops seeing the entry on the next load. Entries the caller cannot
//! use are omitted, never rendered as dead links.

use serde::{Deserialize, Serialize};

use lyceum_session::SessionSnapshot;

/// One entry in a portal's navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Route path the entry links to.
    path: String,
    /// Human-readable label.
    label: String,
    /// Permission required to see the entry, if gated.
    #[serde(default)]
    required_permission: Option<String>,
}

impl NavEntry {
    /// Creates an ungated entry.
    #[must_use]
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            required_permission: None,
        }
    }

    /// Gates the entry behind a permission.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    /// Returns the route path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the gating permission, if any.
    #[must_use]
    pub fn required_permission(&self) -> Option<&str> {
        self.required_permission.as_deref()
    }

    /// Returns true if the current session should see this entry.
    #[must_use]
    pub fn is_visible(&self, session: &SessionSnapshot) -> bool {
        match self.required_permission.as_deref() {
            Some(permission) => session.has_permission(permission),
            None => session.identity().is_some(),
        }
    }
}

/// Filters a menu down to the entries the current session may see.
#[must_use]
pub fn visible_entries<'a>(
    entries: &'a [NavEntry],
    session: &SessionSnapshot,
) -> Vec<&'a NavEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_visible(session))
        .collect()
}
