//!
//! Seed initializer
//! ----------------
//! Populates `users` and `roles` with the fixed default sets on first run.
//! Each collection is checked independently: a collection that loads empty
//! is written with its defaults; anything non-empty is used unchanged, even
//! if it no longer contains every default entry.

use anyhow::Result;
use tracing::info;

use crate::roles::{PermissionSet, Role, ROLES_COLLECTION};
use crate::store::DocumentStore;
use crate::users::{User, UserStatus, USERS_COLLECTION};

/// Seeded usernames. Users carrying one of these can never be deleted.
pub const DEFAULT_USERNAMES: [&str; 3] = ["admin", "editor", "user"];

pub fn default_users() -> Vec<User> {
    let mk = |id: u64, name: &str| User {
        id,
        username: name.to_string(),
        password: format!("{}123", name),
        email: format!("{}@example.com", name),
        role: name.to_string(),
        status: UserStatus::Active,
    };
    vec![mk(1, "admin"), mk(2, "editor"), mk(3, "user")]
}

pub fn default_roles() -> Vec<Role> {
    vec![
        Role { id: 1, name: "admin".into(), permissions: PermissionSet::all() },
        Role {
            id: 2,
            name: "editor".into(),
            permissions: PermissionSet { read: true, write: true, delete: false, admin: false },
        },
        Role {
            id: 3,
            name: "user".into(),
            permissions: PermissionSet { read: true, write: false, delete: false, admin: false },
        },
    ]
}

/// Seed each collection that loads empty, persisting the defaults. Safe to
/// call on every start; non-empty collections are left exactly as stored.
pub fn ensure_defaults(store: &DocumentStore) -> Result<()> {
    let users: Vec<User> = store.load(USERS_COLLECTION);
    if users.is_empty() {
        store.save(USERS_COLLECTION, &default_users())?;
        info!(target: "warden::seed", "seeded {} default users", DEFAULT_USERNAMES.len());
    }
    let roles: Vec<Role> = store.load(ROLES_COLLECTION);
    if roles.is_empty() {
        store.save(ROLES_COLLECTION, &default_roles())?;
        info!(target: "warden::seed", "seeded default roles");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_seed_credentials() {
        let users = default_users();
        assert_eq!(users.len(), 3);
        for u in &users {
            assert!(DEFAULT_USERNAMES.contains(&u.username.as_str()));
            assert_eq!(u.password, format!("{}123", u.username));
            assert_eq!(u.role, u.username);
            assert_eq!(u.status, UserStatus::Active);
        }
        let roles = default_roles();
        assert_eq!(roles.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(roles[0].permissions, PermissionSet::all());
        assert!(roles[1].permissions.write && !roles[1].permissions.delete);
        assert!(roles[2].permissions.read && !roles[2].permissions.write);
    }
}
