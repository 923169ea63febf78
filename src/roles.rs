//!
//! Role registry
//! -------------
//! Roles bundle the four fixed capabilities (`read`, `write`, `delete`,
//! `admin`) under a name. The registry owns the in-memory collection, which
//! is the source of truth during a run; every mutation writes the full
//! collection back through the document store. Role ids 1..=3 are the seeded
//! defaults and can never be deleted.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::store::DocumentStore;

pub const ROLES_COLLECTION: &str = "roles";

/// Ids of the seeded default roles. Deletion of these is always refused.
pub const PROTECTED_ROLE_IDS: [u64; 3] = [1, 2, 3];

/// The fixed permission record. Exactly these four flags exist; any other
/// key in a stored document is rejected at the serde boundary, which makes
/// the containing collection degrade to empty on load.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PermissionSet {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub admin: bool,
}

impl PermissionSet {
    pub fn all() -> Self { Self { read: true, write: true, delete: true, admin: true } }

    /// Names of the currently-true flags, in the fixed key order.
    pub fn granted(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.read { out.push("read"); }
        if self.write { out.push("write"); }
        if self.delete { out.push("delete"); }
        if self.admin { out.push("admin"); }
        out
    }

    /// Display form of the granted flags, as rendered in the role listing.
    pub fn granted_display(&self) -> String { self.granted().join(", ") }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub permissions: PermissionSet,
}

/// Partial update for a role. A provided `permissions` replaces the whole
/// four-flag set; fields left as None are preserved.
#[derive(Debug, Clone, Default)]
pub struct RolePatch {
    pub name: Option<String>,
    pub permissions: Option<PermissionSet>,
}

#[derive(Clone)]
pub struct RoleRegistry {
    store: DocumentStore,
    roles: Arc<RwLock<Vec<Role>>>,
}

impl RoleRegistry {
    /// Load the registry cache from the store. The loaded collection is used
    /// as-is; seeding happens separately (see `seed::ensure_defaults`).
    pub fn open(store: DocumentStore) -> Self {
        let roles: Vec<Role> = store.load(ROLES_COLLECTION);
        Self { store, roles: Arc::new(RwLock::new(roles)) }
    }

    pub fn list(&self) -> Vec<Role> { self.roles.read().clone() }

    pub fn get(&self, id: u64) -> Option<Role> {
        self.roles.read().iter().find(|r| r.id == id).cloned()
    }

    /// First role carrying the given name. Names are intended unique but not
    /// validated, so this resolves collisions by collection order.
    pub fn find_by_name(&self, name: &str) -> Option<Role> {
        self.roles.read().iter().find(|r| r.name == name).cloned()
    }

    /// Append a new role under a freshly allocated id and persist. Duplicate
    /// names are accepted.
    pub fn create(&self, name: &str, permissions: PermissionSet) -> AppResult<Role> {
        let mut w = self.roles.write();
        let id = next_id(w.iter().map(|r| r.id));
        let role = Role { id, name: name.to_string(), permissions };
        w.push(role.clone());
        self.persist(&w)?;
        info!(target: "warden::roles", "create: role '{}' id={}", role.name, role.id);
        Ok(role)
    }

    /// Shallow-merge the patch into the matching role and persist. A missing
    /// id surfaces as NotFound and leaves the collection untouched.
    pub fn update(&self, id: u64, patch: RolePatch) -> AppResult<Role> {
        let mut w = self.roles.write();
        let Some(role) = w.iter_mut().find(|r| r.id == id) else {
            return Err(AppError::not_found("role_not_found", "no role with that id"));
        };
        if let Some(name) = patch.name { role.name = name; }
        if let Some(perms) = patch.permissions { role.permissions = perms; }
        let updated = role.clone();
        self.persist(&w)?;
        Ok(updated)
    }

    /// Remove a role by id and persist. Refused for the seeded default ids;
    /// an unknown id is a silent miss.
    pub fn delete(&self, id: u64) -> AppResult<bool> {
        if PROTECTED_ROLE_IDS.contains(&id) {
            crate::tprintln!("roles.delete refused id={}", id);
            return Err(AppError::protected("protected_role", "cannot delete default roles"));
        }
        let mut w = self.roles.write();
        let before = w.len();
        w.retain(|r| r.id != id);
        if w.len() == before { return Ok(false); }
        self.persist(&w)?;
        info!(target: "warden::roles", "delete: role id={}", id);
        Ok(true)
    }

    fn persist(&self, roles: &[Role]) -> AppResult<()> {
        self.store.save(ROLES_COLLECTION, roles).map_err(AppError::from)
    }
}

/// Allocate an id strictly greater than every existing one. Uniqueness is
/// the only load-bearing property; deleted ids below the maximum are not
/// reused within a run and seeded ids stay below any allocation.
pub(crate) fn next_id(existing: impl Iterator<Item = u64>) -> u64 {
    existing.max().unwrap_or(0).saturating_add(1)
}
