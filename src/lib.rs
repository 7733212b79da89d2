//! Voice-of-Customer client core.
//!
//! The client holds only ephemeral, derived UI state — all persistence,
//! business rules, and authorization live behind the remote HTTP API.
//! Controllers issue API calls and translate each outcome into synchronous
//! dispatches on the state containers; the request view-model is a pure
//! derivation recomputed from (store, filter inputs) whenever either
//! changes.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod notify;
pub mod requests;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use api::{ApiTransport, HttpTransport};
use config::ClientConfig;
use credentials::CredentialStore;
use error::ApiError;
use notify::{Notifier, TracingNotifier};
use requests::{RequestCollectionState, RequestController, SharedRequestStore};
use session::{AuthController, SessionState, SharedSessionStore};

/// Shared application state handed to every controller and view.
///
/// The state containers are explicit, injected collaborators — not ambient
/// globals. Any number of views may read the stores; only the controllers
/// built from this context mutate them.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub api: Arc<dyn ApiTransport>,
    pub credentials: Arc<CredentialStore>,
    pub notifier: Arc<dyn Notifier>,
    pub requests: SharedRequestStore,
    pub session: SharedSessionStore,
}

impl AppContext {
    /// Production wiring: reqwest transport, tracing-backed toasts, empty
    /// stores.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let credentials = Arc::new(CredentialStore::new());
        let api = Arc::new(HttpTransport::new(
            &config.api_base_url,
            Arc::clone(&credentials),
            Duration::from_secs(config.timeout_secs),
        )?);
        Ok(Self::with_parts(config, api, credentials, Arc::new(TracingNotifier)))
    }

    /// Custom wiring for tests and embedders: bring your own transport and
    /// notifier.
    pub fn with_parts(
        config: ClientConfig,
        api: Arc<dyn ApiTransport>,
        credentials: Arc<CredentialStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            api,
            credentials,
            notifier,
            requests: RequestCollectionState::shared(),
            session: SessionState::shared(),
        }
    }

    pub fn request_controller(&self) -> RequestController {
        RequestController::new(
            Arc::clone(&self.api),
            Arc::clone(&self.requests),
            Arc::clone(&self.notifier),
        )
    }

    pub fn auth_controller(&self) -> AuthController {
        AuthController::new(
            Arc::clone(&self.api),
            Arc::clone(&self.credentials),
            Arc::clone(&self.session),
            Arc::clone(&self.notifier),
        )
    }
}
