//! Role and portal types for platform access control.
//!
//! The platform serves three disjoint portals. Every role belongs to
//! exactly one portal; the mapping is exhaustive so that adding a role
//! without routing it is a compile error rather than a blank screen.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A portal is one of the three disjoint route trees of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Portal {
    /// Platform-operator portal: owner, staff, and admin roles.
    Operator,
    /// Tenant-administrator portal.
    TenantAdmin,
    /// End-user portal: faculty and students.
    Learner,
}

impl Portal {
    /// Returns the stable identifier for this portal.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::TenantAdmin => "tenant_admin",
            Self::Learner => "learner",
        }
    }

    /// Returns the root path of this portal's route tree.
    #[must_use]
    pub fn root_path(&self) -> &'static str {
        match self {
            Self::Operator => "/operator",
            Self::TenantAdmin => "/admin",
            Self::Learner => "/learn",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role assigned to an authenticated identity by the server.
///
/// Roles are immutable for the lifetime of a session; a server-side role
/// change only takes effect after a fresh identity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform owner with full operator capabilities.
    PlatformOwner,
    /// Platform staff member handling support and oversight.
    PlatformStaff,
    /// Platform administrator managing tenants and global settings.
    PlatformAdmin,
    /// Administrator of a single tenant institution.
    TenantAdmin,
    /// Teaching staff within a tenant.
    Faculty,
    /// Enrolled learner within a tenant.
    Student,
}

impl Role {
    /// Returns the portal this role is routed into.
    ///
    /// The match is exhaustive on purpose: a new role cannot be added
    /// without deciding where it lands.
    #[must_use]
    pub fn portal(&self) -> Portal {
        match self {
            Self::PlatformOwner | Self::PlatformStaff | Self::PlatformAdmin => Portal::Operator,
            Self::TenantAdmin => Portal::TenantAdmin,
            Self::Faculty | Self::Student => Portal::Learner,
        }
    }

    /// Returns true for roles that operate above any single tenant.
    ///
    /// Platform-level roles are not scoped to a tenant and may access
    /// data for any tenant.
    #[must_use]
    pub fn is_platform_level(&self) -> bool {
        matches!(
            self,
            Self::PlatformOwner | Self::PlatformStaff | Self::PlatformAdmin
        )
    }

    /// Returns the wire name of this role as issued by the server.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlatformOwner => "PLATFORM_OWNER",
            Self::PlatformStaff => "PLATFORM_STAFF",
            Self::PlatformAdmin => "PLATFORM_ADMIN",
            Self::TenantAdmin => "TENANT_ADMIN",
            Self::Faculty => "FACULTY",
            Self::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_roles_route_to_operator_portal() {
        assert_eq!(Role::PlatformOwner.portal(), Portal::Operator);
        assert_eq!(Role::PlatformStaff.portal(), Portal::Operator);
        assert_eq!(Role::PlatformAdmin.portal(), Portal::Operator);
    }

    #[test]
    fn tenant_admin_routes_to_tenant_admin_portal() {
        assert_eq!(Role::TenantAdmin.portal(), Portal::TenantAdmin);
    }

    #[test]
    fn end_user_roles_route_to_learner_portal() {
        assert_eq!(Role::Faculty.portal(), Portal::Learner);
        assert_eq!(Role::Student.portal(), Portal::Learner);
    }

    #[test]
    fn platform_level_roles() {
        assert!(Role::PlatformOwner.is_platform_level());
        assert!(Role::PlatformStaff.is_platform_level());
        assert!(Role::PlatformAdmin.is_platform_level());
        assert!(!Role::TenantAdmin.is_platform_level());
        assert!(!Role::Faculty.is_platform_level());
        assert!(!Role::Student.is_platform_level());
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::PlatformOwner).expect("serialize");
        assert_eq!(json, "\"PLATFORM_OWNER\"");

        let json = serde_json::to_string(&Role::TenantAdmin).expect("serialize");
        assert_eq!(json, "\"TENANT_ADMIN\"");
    }

    #[test]
    fn role_deserializes_from_wire_name() {
        let role: Role = serde_json::from_str("\"FACULTY\"").expect("deserialize");
        assert_eq!(role, Role::Faculty);
    }

    #[test]
    fn portal_root_paths_are_distinct() {
        use std::collections::HashSet;

        let paths: HashSet<_> = [Portal::Operator, Portal::TenantAdmin, Portal::Learner]
            .iter()
            .map(|p| p.root_path())
            .collect();
        assert_eq!(paths.len(), 3);
    }
}
