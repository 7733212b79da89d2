//! Remote API boundary.
//!
//! [`ApiTransport`] is the seam between the controllers and the wire: the
//! production impl is [`HttpTransport`] (reqwest), tests script a fake. Every
//! method returns a parsed JSON body or an [`ApiError`] carrying a
//! human-readable message.

pub mod http;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

/// Endpoint paths consumed by the client.
pub mod paths {
    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/auth/signup";
    pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/auth/reset-password";
    pub const LOGOUT: &str = "/auth/logout";
    pub const ME: &str = "/auth/me";
    pub const REQUESTS: &str = "/api/customer-requests";

    pub fn request(id: &str) -> String {
        format!("{REQUESTS}/{id}")
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOpts {
    /// Attach the stored bearer credential. A call that requires auth with
    /// an empty credential slot fails before touching the network.
    pub requires_auth: bool,
}

impl RequestOpts {
    pub fn public() -> Self {
        Self {
            requires_auth: false,
        }
    }

    pub fn authed() -> Self {
        Self {
            requires_auth: true,
        }
    }
}

/// Async HTTP transport seam. `Send + Sync` so controllers can share one
/// instance behind an `Arc`.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get(&self, path: &str, opts: RequestOpts) -> Result<Value, ApiError>;
    async fn post(&self, path: &str, body: Value, opts: RequestOpts) -> Result<Value, ApiError>;
    async fn put(&self, path: &str, body: Value, opts: RequestOpts) -> Result<Value, ApiError>;
    async fn delete(&self, path: &str, opts: RequestOpts) -> Result<Value, ApiError>;
}
