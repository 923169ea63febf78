use crate::roles::{PermissionSet, RoleRegistry};

/// Which management surface an authenticated role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagementView {
    /// User and role management side by side.
    Full,
    /// User management only.
    UsersOnly,
    /// No management surface; only an access-denied notice.
    Denied,
}

/// Select the management surface for a session role.
///
/// Role comparisons are byte-exact; sessions store role names lowercase, and
/// no case folding happens here. Editors get exactly the user-management
/// surface — stated once, here, rather than behind a second comparison that
/// could drift from the stored casing.
pub fn view_for(role: &str) -> ManagementView {
    match role {
        "admin" => ManagementView::Full,
        "editor" => ManagementView::UsersOnly,
        _ => ManagementView::Denied,
    }
}

/// Resolve a role name to its permission set by joining against the role
/// registry at the call site. A name that matches no stored role resolves to
/// the all-false set, so dangling `User.role` references grant nothing.
pub fn resolve_permissions(roles: &RoleRegistry, role_name: &str) -> PermissionSet {
    roles
        .find_by_name(role_name)
        .map(|r| r.permissions)
        .unwrap_or_default()
}
