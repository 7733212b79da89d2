//! Auth controller: login, signup, logout, password reset, current user.
//!
//! Authentication failures do not distinguish wrong-password from other
//! causes — the UI gets one fixed generic message either way.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::api::{paths, ApiTransport, RequestOpts};
use crate::credentials::CredentialStore;
use crate::error::{ApiError, ControllerError};
use crate::notify::Notifier;

use super::state::SharedSessionStore;

/// The one message every authentication failure surfaces.
pub const GENERIC_AUTH_ERROR: &str =
    "Authentication failed. Please check your credentials and try again.";

enum AuthKind {
    Login,
    Signup,
}

pub struct AuthController {
    api: Arc<dyn ApiTransport>,
    credentials: Arc<CredentialStore>,
    session: SharedSessionStore,
    notifier: Arc<dyn Notifier>,
}

impl AuthController {
    pub fn new(
        api: Arc<dyn ApiTransport>,
        credentials: Arc<CredentialStore>,
        session: SharedSessionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            credentials,
            session,
            notifier,
        }
    }

    /// App bootstrap. The application always starts logged out regardless of
    /// any previously persisted credential, so the slot is cleared before
    /// the session initializes (anonymous branch). Applied exactly once per
    /// process — later calls leave an authenticated session alone.
    pub async fn initialize(&self) {
        self.credentials.clear().await;
        self.session.write().await.initialize(false, None);
        debug!("session initialized (anonymous)");
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ControllerError> {
        self.session.write().await.auth_start();
        let body = json!({ "email": email, "password": password });
        match self.api.post(paths::LOGIN, body, RequestOpts::public()).await {
            Ok(resp) => self.complete_auth(resp, AuthKind::Login).await,
            Err(err) => Err(self.auth_fail(err).await),
        }
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Value, ControllerError> {
        self.session.write().await.auth_start();
        let body = json!({ "email": email, "password": password, "name": name });
        match self
            .api
            .post(paths::SIGNUP, body, RequestOpts::public())
            .await
        {
            Ok(resp) => self.complete_auth(resp, AuthKind::Signup).await,
            Err(err) => Err(self.auth_fail(err).await),
        }
    }

    /// Log out. Local logout always wins: the credential and session are
    /// cleared even when the remote call fails — a dead network must never
    /// leave the client stuck logged in.
    pub async fn logout(&self) {
        if let Err(err) = self
            .api
            .post(paths::LOGOUT, Value::Null, RequestOpts::authed())
            .await
        {
            warn!(err = %err, "remote logout failed; clearing local session anyway");
        }
        self.credentials.clear().await;
        self.session.write().await.logout();
        self.notifier.success("Logged out");
    }

    /// Request a password-reset email.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ControllerError> {
        self.session.write().await.auth_start();
        let body = json!({ "email": email });
        match self
            .api
            .post(paths::FORGOT_PASSWORD, body, RequestOpts::public())
            .await
        {
            Ok(_) => {
                self.session.write().await.reset_email_sent();
                self.notifier.success("Password reset email sent");
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Complete a password reset with the token from the emailed link. A
    /// missing token never reaches the network — it is terminal for this
    /// flow and needs a fresh link.
    pub async fn reset_password(
        &self,
        token: Option<&str>,
        new_password: &str,
    ) -> Result<(), ControllerError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ControllerError::MissingResetToken)?;

        self.session.write().await.auth_start();
        let body = json!({ "token": token, "password": new_password });
        match self
            .api
            .post(paths::RESET_PASSWORD, body, RequestOpts::public())
            .await
        {
            Ok(_) => {
                self.session.write().await.logout(); // back to anonymous-initialized
                self.notifier.success("Password updated — you can now log in");
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Fetch the authenticated user.
    pub async fn current_user(&self) -> Result<Value, ControllerError> {
        let resp = self.api.get(paths::ME, RequestOpts::authed()).await?;
        Ok(resp.get("user").cloned().unwrap_or(resp))
    }

    async fn complete_auth(&self, resp: Value, kind: AuthKind) -> Result<Value, ControllerError> {
        let Some(token) = resp.get("token").and_then(Value::as_str) else {
            let err = ControllerError::MalformedResponse("auth response carried no token".into());
            self.session.write().await.auth_failure(GENERIC_AUTH_ERROR);
            self.notifier.error(GENERIC_AUTH_ERROR);
            return Err(err);
        };
        let user = resp.get("user").cloned().unwrap_or(Value::Null);

        self.credentials.set(token).await;
        {
            let mut session = self.session.write().await;
            match kind {
                AuthKind::Login => session.login_success(user.clone()),
                AuthKind::Signup => session.signup_success(user.clone()),
            }
        }
        self.notifier.success(match kind {
            AuthKind::Login => "Welcome back",
            AuthKind::Signup => "Account created",
        });
        Ok(user)
    }

    /// Login/signup failure path: fixed generic message, authentication
    /// state untouched.
    async fn auth_fail(&self, err: ApiError) -> ControllerError {
        warn!(err = %err, "authentication failed");
        self.session.write().await.auth_failure(GENERIC_AUTH_ERROR);
        self.notifier.error(GENERIC_AUTH_ERROR);
        ControllerError::Api(err)
    }

    /// Non-login failure path (forgot/reset): surface the server's message.
    async fn fail(&self, err: ApiError) -> ControllerError {
        let message = err.to_string();
        self.session.write().await.auth_failure(&message);
        self.notifier.error(&message);
        ControllerError::Api(err)
    }
}
