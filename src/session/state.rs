//! Session/auth state machine.
//!
//! Lifecycle: `anonymous-uninitialized → anonymous-initialized ⇄
//! authenticated`. `is_initialized` latches true exactly once — at bootstrap
//! or on the first successful login/signup — and never reverts while the
//! application runs.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the session state.
pub type SharedSessionStore = Arc<RwLock<SessionState>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    /// Opaque user object as the server sent it.
    pub user: Option<Value>,
    pub is_authenticated: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub password_reset_requested: bool,
    pub is_initialized: bool,
}

impl SessionState {
    /// Create an uninitialized, anonymous, shareable session — the state at
    /// process start.
    pub fn shared() -> SharedSessionStore {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Bootstrap transition, applied exactly once: moves uninitialized →
    /// initialized on either branch. Later calls are no-ops, so a session
    /// already authenticated by a login cannot be knocked back. The caller
    /// clears the stored credential before invoking this — the application
    /// always starts logged out.
    pub fn initialize(&mut self, is_authenticated: bool, user: Option<Value>) {
        if self.is_initialized {
            return;
        }
        self.user = user;
        self.is_authenticated = is_authenticated;
        self.is_initialized = true;
        self.loading = false;
    }

    /// An auth operation began: raise `loading`, clear stale error and
    /// reset-request state.
    pub fn auth_start(&mut self) {
        self.loading = true;
        self.error = None;
        self.password_reset_requested = false;
    }

    pub fn login_success(&mut self, user: Value) {
        self.loading = false;
        self.user = Some(user);
        self.is_authenticated = true;
        self.is_initialized = true;
        self.error = None;
    }

    pub fn signup_success(&mut self, user: Value) {
        // Same state change as a login — a fresh account is logged in.
        self.login_success(user);
    }

    /// Authentication failed: record the message, leave the authentication
    /// state itself unchanged.
    pub fn auth_failure(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Drop the user and authentication; `is_initialized` stays latched.
    pub fn logout(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.error = None;
        self.loading = false;
    }

    /// A password-reset email was requested successfully.
    pub fn reset_email_sent(&mut self) {
        self.loading = false;
        self.password_reset_requested = true;
    }
}
