// Keep provider request types plain Rust structs to avoid serde requirements
// on the session surface.
use tracing::info;

use super::session::SessionManager;
use crate::error::{AppError, AppResult};
use crate::users::{User, UserRegistry};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub trait AuthProvider: Send + Sync {
    fn login(&self, req: &LoginRequest) -> AppResult<User>;
}

/// Authenticates against the local user registry and installs the result as
/// the active session.
#[derive(Clone)]
pub struct LocalAuthProvider {
    users: UserRegistry,
    sessions: SessionManager,
}

impl LocalAuthProvider {
    pub fn new(users: UserRegistry, sessions: SessionManager) -> Self { Self { users, sessions } }

    pub fn sessions(&self) -> &SessionManager { &self.sessions }

    /// End the active session, if any. Always succeeds.
    pub fn logout(&self) -> bool {
        let had = self.sessions.clear();
        if had {
            info!(target: "warden::auth", "logout");
        }
        had
    }

    pub fn current(&self) -> Option<User> { self.sessions.current() }

    /// Create a new account. Does not log the new user in; a fresh login is
    /// required afterwards.
    pub fn register(&self, username: &str, password: &str, email: &str, role: &str) -> AppResult<User> {
        self.users.register(username, password, email, role)
    }
}

impl AuthProvider for LocalAuthProvider {
    fn login(&self, req: &LoginRequest) -> AppResult<User> {
        // Credentials are compared verbatim, both fields case-sensitive.
        // A failed match leaves the current session untouched.
        let matched = self
            .users
            .list()
            .into_iter()
            .find(|u| u.username == req.username && u.password == req.password);
        let Some(user) = matched else {
            return Err(AppError::auth("invalid_credentials", "invalid username or password"));
        };
        self.sessions.set(user.clone());
        info!(target: "warden::auth", "login user={} role={}", user.username, user.role);
        Ok(user)
    }
}
