use std::sync::Arc;

use parking_lot::RwLock;

use crate::users::User;

/// Holder of the single active session: at most one authenticated user per
/// process. Never persisted; a restart always returns to the logged-out
/// state. Clones share the same slot.
#[derive(Clone, Default)]
pub struct SessionManager {
    current: Arc<RwLock<Option<User>>>,
}

impl SessionManager {
    pub fn new() -> Self { Self::default() }

    /// Install the given user as the active session, replacing any previous
    /// one.
    pub fn set(&self, user: User) {
        crate::tprintln!("session.set user={} role={}", user.username, user.role);
        *self.current.write() = Some(user);
    }

    /// Snapshot of the currently authenticated user, if any.
    pub fn current(&self) -> Option<User> { self.current.read().clone() }

    pub fn is_authenticated(&self) -> bool { self.current.read().is_some() }

    /// Clear the session unconditionally. Returns whether a session was
    /// active; clearing twice in a row equals clearing once.
    pub fn clear(&self) -> bool {
        let had = self.current.write().take().is_some();
        if had {
            crate::tprintln!("session.clear");
        }
        had
    }
}
