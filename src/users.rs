//!
//! Identity registry
//! -----------------
//! Users carry a username (unique across the collection at all times), an
//! opaque password compared verbatim at login, an email, the name of a role
//! and an active/inactive status. The registry owns the in-memory collection
//! and writes it back whole after every mutation. The three seeded usernames
//! can never be removed.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::roles::next_id;
use crate::seed::DEFAULT_USERNAMES;
use crate::store::DocumentStore;

pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub status: UserStatus,
}

/// Partial update for a user. The username is deliberately not patchable so
/// the uniqueness invariant cannot be violated through an update.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<UserStatus>,
}

#[derive(Clone)]
pub struct UserRegistry {
    store: DocumentStore,
    users: Arc<RwLock<Vec<User>>>,
}

impl UserRegistry {
    /// Load the registry cache from the store; the loaded collection is used
    /// as-is (seeding happens separately, see `seed::ensure_defaults`).
    pub fn open(store: DocumentStore) -> Self {
        let users: Vec<User> = store.load(USERS_COLLECTION);
        Self { store, users: Arc::new(RwLock::new(users)) }
    }

    pub fn list(&self) -> Vec<User> { self.users.read().clone() }

    pub fn get(&self, id: u64) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.users.read().iter().find(|u| u.username == username).cloned()
    }

    /// Create a new Active user and persist. The username must not already
    /// exist (case-sensitive exact match); the role string is accepted
    /// without a referential check against the role registry.
    pub fn register(&self, username: &str, password: &str, email: &str, role: &str) -> AppResult<User> {
        let mut w = self.users.write();
        if w.iter().any(|u| u.username == username) {
            return Err(AppError::conflict("duplicate_username", "username already exists"));
        }
        let user = User {
            id: next_id(w.iter().map(|u| u.id)),
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            status: UserStatus::Active,
        };
        w.push(user.clone());
        self.persist(&w)?;
        info!(target: "warden::users", "register: user '{}' id={} role={}", user.username, user.id, user.role);
        Ok(user)
    }

    /// Shallow-merge the patch into the matching user and persist. A missing
    /// id surfaces as NotFound and leaves the collection untouched.
    pub fn update(&self, id: u64, patch: UserPatch) -> AppResult<User> {
        let mut w = self.users.write();
        let Some(user) = w.iter_mut().find(|u| u.id == id) else {
            return Err(AppError::not_found("user_not_found", "no user with that id"));
        };
        if let Some(password) = patch.password { user.password = password; }
        if let Some(email) = patch.email { user.email = email; }
        if let Some(role) = patch.role { user.role = role; }
        if let Some(status) = patch.status { user.status = status; }
        let updated = user.clone();
        self.persist(&w)?;
        Ok(updated)
    }

    /// Remove a user by id and persist. Refused when the resolved username is
    /// one of the seeded defaults; an unknown id is a silent miss.
    pub fn delete(&self, id: u64) -> AppResult<bool> {
        let mut w = self.users.write();
        let Some(target) = w.iter().find(|u| u.id == id) else { return Ok(false); };
        if DEFAULT_USERNAMES.contains(&target.username.as_str()) {
            crate::tprintln!("users.delete refused username={}", target.username);
            return Err(AppError::protected("protected_user", "cannot delete default users"));
        }
        w.retain(|u| u.id != id);
        self.persist(&w)?;
        info!(target: "warden::users", "delete: user id={}", id);
        Ok(true)
    }

    fn persist(&self, users: &[User]) -> AppResult<()> {
        self.store.save(USERS_COLLECTION, users).map_err(AppError::from)
    }
}
