//! The three portal route trees and root landing dispatch.
//!
//! Each portal is an independent route tree rooted behind a role-set
//! rule. The landing dispatcher sends a resolved identity into exactly
//! one tree via the exhaustive role-to-portal mapping; no path is
//! reachable by two different role families.

use tracing::debug;

use crate::guard::{GuardOutcome, RouteRule, decide};
use crate::nav::{NavEntry, visible_entries};
use lyceum_session::{Portal, Role, SessionSnapshot, permission};

/// One portal's route tree: a root rule plus its navigation menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalTree {
    portal: Portal,
    root_rule: RouteRule,
    nav: Vec<NavEntry>,
}

impl PortalTree {
    /// The platform-operator tree.
    #[must_use]
    pub fn operator() -> Self {
        Self {
            portal: Portal::Operator,
            root_rule: RouteRule::roles([
                Role::PlatformOwner,
                Role::PlatformStaff,
                Role::PlatformAdmin,
            ]),
            nav: vec![
                NavEntry::new("/operator/tenants", "Tenants"),
                NavEntry::new("/operator/courses", "Courses")
                    .with_permission(permission::COURSE_READ),
                NavEntry::new("/operator/kb", "Knowledge Base")
                    .with_permission(permission::KB_READ),
                NavEntry::new("/operator/documents", "Documents")
                    .with_permission(permission::DOCUMENT_READ),
                NavEntry::new("/operator/chat", "Assistant").with_permission(permission::CHAT_USE),
            ],
        }
    }

    /// The tenant-administrator tree.
    #[must_use]
    pub fn tenant_admin() -> Self {
        Self {
            portal: Portal::TenantAdmin,
            root_rule: RouteRule::roles([Role::TenantAdmin]),
            nav: vec![
                NavEntry::new("/admin/courses", "Courses")
                    .with_permission(permission::COURSE_READ),
                NavEntry::new("/admin/kb", "Knowledge Base")
                    .with_permission(permission::KB_READ),
                NavEntry::new("/admin/documents", "Documents")
                    .with_permission(permission::DOCUMENT_READ),
                NavEntry::new("/admin/videos", "Videos").with_permission(permission::VIDEO_READ),
                NavEntry::new("/admin/ai-settings", "AI Settings")
                    .with_permission(permission::AI_SETTINGS_UPDATE),
            ],
        }
    }

    /// The end-user tree for faculty and students.
    #[must_use]
    pub fn learner() -> Self {
        Self {
            portal: Portal::Learner,
            root_rule: RouteRule::roles([Role::Faculty, Role::Student]),
            nav: vec![
                NavEntry::new("/learn/courses", "Courses")
                    .with_permission(permission::COURSE_READ),
                NavEntry::new("/learn/kb", "Knowledge Base")
                    .with_permission(permission::KB_READ),
                NavEntry::new("/learn/documents", "Documents")
                    .with_permission(permission::DOCUMENT_READ),
                NavEntry::new("/learn/videos", "Videos").with_permission(permission::VIDEO_READ),
                NavEntry::new("/learn/chat", "Assistant").with_permission(permission::CHAT_USE),
            ],
        }
    }

    /// Returns the portal this tree serves.
    #[must_use]
    pub fn portal(&self) -> Portal {
        self.portal
    }

    /// Returns the rule guarding the tree root.
    #[must_use]
    pub fn root_rule(&self) -> &RouteRule {
        &self.root_rule
    }

    /// Returns the full navigation menu, unfiltered.
    #[must_use]
    pub fn nav(&self) -> &[NavEntry] {
        &self.nav
    }

    /// Returns the menu entries the current session may see.
    #[must_use]
    pub fn visible_nav(&self, session: &SessionSnapshot) -> Vec<&NavEntry> {
        visible_entries(&self.nav, session)
    }

    /// Guards entry into this tree.
    #[must_use]
    pub fn guard(&self, session: &SessionSnapshot) -> GuardOutcome {
        decide(session, &self.root_rule)
    }

    /// Returns the effective rule for a path inside this tree.
    ///
    /// The root role restriction always applies; a path backing a gated
    /// navigation entry additionally requires that entry's permission.
    #[must_use]
    pub fn rule_for(&self, path: &str) -> RouteRule {
        let mut rule = self.root_rule.clone();
        if let Some(permission) = self
            .nav
            .iter()
            .find(|entry| entry.path() == path)
            .and_then(NavEntry::required_permission)
        {
            rule = rule.with_permission(permission);
        }
        rule
    }
}

/// The root router over the three portal trees.
#[derive(Debug, Clone)]
pub struct PortalRouter {
    operator: PortalTree,
    tenant_admin: PortalTree,
    learner: PortalTree,
}

impl PortalRouter {
    /// Builds the standard three-portal router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operator: PortalTree::operator(),
            tenant_admin: PortalTree::tenant_admin(),
            learner: PortalTree::learner(),
        }
    }

    /// Returns the tree serving `portal`.
    #[must_use]
    pub fn tree(&self, portal: Portal) -> &PortalTree {
        match portal {
            Portal::Operator => &self.operator,
            Portal::TenantAdmin => &self.tenant_admin,
            Portal::Learner => &self.learner,
        }
    }

    /// Iterates the trees in landing order.
    fn trees(&self) -> [&PortalTree; 3] {
        [&self.operator, &self.tenant_admin, &self.learner]
    }

    /// Root-level dispatch on first load.
    ///
    /// A resolved identity is sent to the home of its own portal; an
    /// absent one to login.
    #[must_use]
    pub fn landing(&self, session: &SessionSnapshot) -> GuardOutcome {
        if session.is_loading() {
            return GuardOutcome::Pending;
        }
        match session.identity() {
            Some(identity) => GuardOutcome::RedirectHome(identity.portal()),
            None => GuardOutcome::RedirectLogin,
        }
    }

    /// Guards an absolute path against the tree that owns it.
    ///
    /// Paths outside every tree fall back to the landing dispatch.
    #[must_use]
    pub fn resolve(&self, path: &str, session: &SessionSnapshot) -> GuardOutcome {
        let Some(tree) = self
            .trees()
            .into_iter()
            .find(|tree| path.starts_with(tree.portal().root_path()))
        else {
            return self.landing(session);
        };

        let outcome = decide(session, &tree.rule_for(path));
        if let GuardOutcome::RedirectHome(home) = outcome {
            debug!(path, portal = %tree.portal(), home = %home, "route denied");
        }
        outcome
    }
}

impl Default for PortalRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyceum_core::UserId;
    use lyceum_session::{Identity, SessionHandle};

    fn session_for(role: Role, permissions: &[&str]) -> SessionSnapshot {
        let handle = SessionHandle::new();
        handle.set_identity(
            Identity::new(UserId::new(), "user@example.edu".to_string(), role)
                .with_permissions(permissions.iter().copied()),
        );
        handle.snapshot()
    }

    fn signed_out() -> SessionSnapshot {
        let handle = SessionHandle::new();
        handle.mark_unauthenticated();
        handle.snapshot()
    }

    #[test]
    fn every_role_lands_in_exactly_one_tree() {
        let router = PortalRouter::new();
        let roles = [
            Role::PlatformOwner,
            Role::PlatformStaff,
            Role::PlatformAdmin,
            Role::TenantAdmin,
            Role::Faculty,
            Role::Student,
        ];

        for role in roles {
            let session = session_for(role, &[]);
            let GuardOutcome::RedirectHome(portal) = router.landing(&session) else {
                panic!("expected a home redirect for {role}");
            };
            // The landing portal admits the role; the other two do not.
            assert_eq!(
                router.tree(portal).guard(&session),
                GuardOutcome::Allow,
                "{role} must enter its own tree"
            );
            let admitted = [Portal::Operator, Portal::TenantAdmin, Portal::Learner]
                .iter()
                .filter(|p| router.tree(**p).guard(&session) == GuardOutcome::Allow)
                .count();
            assert_eq!(admitted, 1, "{role} must be admitted to exactly one tree");
        }
    }

    #[test]
    fn landing_redirects_signed_out_to_login() {
        let router = PortalRouter::new();
        assert_eq!(router.landing(&signed_out()), GuardOutcome::RedirectLogin);
    }

    #[test]
    fn landing_is_pending_while_loading() {
        let router = PortalRouter::new();
        let handle = SessionHandle::new();
        assert_eq!(router.landing(&handle.snapshot()), GuardOutcome::Pending);
    }

    #[test]
    fn student_on_admin_path_goes_to_learner_home() {
        let router = PortalRouter::new();
        let session = session_for(Role::Student, &[permission::COURSE_READ]);

        assert_eq!(
            router.resolve("/admin/courses", &session),
            GuardOutcome::RedirectHome(Portal::Learner)
        );
    }

    #[test]
    fn route_without_required_permission_redirects() {
        let router = PortalRouter::new();
        // Role is right, permission is not.
        let session = session_for(Role::TenantAdmin, &[permission::COURSE_READ]);

        assert_eq!(
            router.resolve("/admin/ai-settings", &session),
            GuardOutcome::RedirectHome(Portal::TenantAdmin)
        );
        assert_eq!(
            router.resolve("/admin/courses", &session),
            GuardOutcome::Allow
        );
    }

    #[test]
    fn unknown_path_falls_back_to_landing() {
        let router = PortalRouter::new();
        let session = session_for(Role::Faculty, &[]);

        assert_eq!(
            router.resolve("/nowhere", &session),
            GuardOutcome::RedirectHome(Portal::Learner)
        );
    }

    #[test]
    fn visible_nav_follows_permissions() {
        let router = PortalRouter::new();
        let session = session_for(
            Role::TenantAdmin,
            &[permission::COURSE_READ, permission::KB_READ],
        );

        let paths: Vec<_> = router
            .tree(Portal::TenantAdmin)
            .visible_nav(&session)
            .iter()
            .map(|e| e.path())
            .collect();

        assert_eq!(paths, vec!["/admin/courses", "/admin/kb"]);
    }

    #[test]
    fn operator_tenants_entry_needs_no_permission() {
        let router = PortalRouter::new();
        let session = session_for(Role::PlatformStaff, &[]);

        let paths: Vec<_> = router
            .tree(Portal::Operator)
            .visible_nav(&session)
            .iter()
            .map(|e| e.path())
            .collect();

        assert_eq!(paths, vec!["/operator/tenants"]);
    }

    #[test]
    fn rule_for_composes_root_roles_with_entry_permission() {
        let tree = PortalTree::learner();
        let rule = tree.rule_for("/learn/courses");

        assert_eq!(
            rule.required_roles(),
            Some([Role::Faculty, Role::Student].as_slice())
        );
        assert_eq!(rule.required_permission(), Some(permission::COURSE_READ));
    }
}
