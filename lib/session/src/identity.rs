//! The authenticated identity snapshot.
//!
//! An `Identity` is built once from the identity probe response and is
//! immutable for the duration of a session. The client never merges
//! partial updates; a role or permission change on the server takes
//! effect only after a fresh probe.

use serde::{Deserialize, Serialize};

use lyceum_core::{TenantId, UserId};

use crate::permission::PermissionSet;
use crate::role::{Portal, Role};

/// The authenticated caller, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// The user's platform-wide ID.
    id: UserId,
    /// The user's email address.
    email: String,
    /// Display name, if the user has set one.
    #[serde(default)]
    display_name: Option<String>,
    /// The user's single role.
    role: Role,
    /// The tenant this identity belongs to. Absent for platform-level roles.
    #[serde(default)]
    tenant_id: Option<TenantId>,
    /// Permission strings issued by the server for this identity.
    #[serde(default)]
    permissions: PermissionSet,
}

impl Identity {
    /// Creates an identity with no display name, tenant, or permissions.
    ///
    /// Intended for construction in tests and fixtures; production
    /// identities are deserialized from the probe response.
    #[must_use]
    pub fn new(id: UserId, email: String, role: Role) -> Self {
        Self {
            id,
            email,
            display_name: None,
            role,
            tenant_id: None,
            permissions: PermissionSet::none(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    /// Sets the tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: Option<TenantId>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Sets the permission set.
    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().collect();
        self
    }

    /// Returns the user's ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name, if set.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the tenant this identity is scoped to, if any.
    #[must_use]
    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Returns the permission set issued for this identity.
    #[must_use]
    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Returns true iff this identity holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.has(permission)
    }

    /// Returns the portal this identity is routed into.
    #[must_use]
    pub fn portal(&self) -> Portal {
        self.role.portal()
    }

    /// Returns true if this identity may access data for `tenant`.
    ///
    /// Platform-level roles may access any tenant; tenant-scoped roles
    /// only their own.
    #[must_use]
    pub fn can_access_tenant(&self, tenant: TenantId) -> bool {
        if self.role.is_platform_level() {
            return true;
        }
        self.tenant_id == Some(tenant)
    }
}
