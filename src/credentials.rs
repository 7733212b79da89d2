//! Process-wide bearer credential slot.
//!
//! Holds at most one bearer token. The slot starts empty and is cleared on
//! every application startup and on logout — the client always begins a run
//! logged out, regardless of anything persisted elsewhere. The token is only
//! ever forwarded as an `Authorization: Bearer` header by the transport;
//! nothing else reads it.

use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct CredentialStore {
    token: RwLock<Option<String>>,
}

impl CredentialStore {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn clear(&self) {
        *self.token.write().await = None;
    }
}
