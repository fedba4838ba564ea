//! Permission strings and the per-identity permission set.
//!
//! Permissions are opaque capability identifiers issued by the server
//! alongside the identity. The client enforces the cached copy verbatim:
//! checks are exact set membership, with no wildcard and no role-based
//! bypass. Even a platform owner must carry the permission string a
//! screen requires.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Use the chat assistant.
pub const CHAT_USE: &str = "CHAT_USE";
/// View courses and their materials.
pub const COURSE_READ: &str = "COURSE_READ";
/// Create and edit courses.
pub const COURSE_WRITE: &str = "COURSE_WRITE";
/// View knowledge-base articles.
pub const KB_READ: &str = "KB_READ";
/// Create and edit knowledge-base articles.
pub const KB_WRITE: &str = "KB_WRITE";
/// View uploaded documents.
pub const DOCUMENT_READ: &str = "DOCUMENT_READ";
/// Upload and manage documents.
pub const DOCUMENT_WRITE: &str = "DOCUMENT_WRITE";
/// View video content.
pub const VIDEO_READ: &str = "VIDEO_READ";
/// Upload and manage video content.
pub const VIDEO_WRITE: &str = "VIDEO_WRITE";
/// Change a tenant's AI assistant settings.
pub const AI_SETTINGS_UPDATE: &str = "AI_SETTINGS_UPDATE";

/// The set of permission strings held by an identity.
///
/// Deserialized directly from the server's JSON array; never mutated
/// client-side. A role or permission change on the server requires a
/// fresh identity probe to become visible here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: HashSet<String>,
}

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true iff `permission` is in the set.
    ///
    /// Exact membership only. `"*"` is server-side policy vocabulary and
    /// grants nothing here.
    #[must_use]
    pub fn has(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Returns the number of permissions held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns true if no permissions are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Iterates over the held permission strings.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().map(Into::into).collect(),
        }
    }
}
