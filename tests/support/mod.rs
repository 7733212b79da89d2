//! Shared test doubles: a scripted API transport and recording notifier.
//!
//! `ScriptedTransport` answers calls from a FIFO queue of canned replies and
//! logs every call it sees, so tests can assert both the dispatched state
//! and the exact wire traffic.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use vocc::api::{ApiTransport, RequestOpts};
use vocc::config::ClientConfig;
use vocc::credentials::CredentialStore;
use vocc::error::ApiError;
use vocc::notify::RecordingNotifier;
use vocc::AppContext;

/// One observed transport call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
    pub requires_auth: bool,
}

/// A canned reply.
pub enum Reply {
    Ok(Value),
    Remote(u16, &'static str),
    Transport(&'static str),
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn push_ok(&self, body: Value) {
        self.replies.lock().unwrap().push_back(Reply::Ok(body));
    }

    pub fn push_remote(&self, status: u16, message: &'static str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Remote(status, message));
    }

    pub fn push_transport_error(&self, message: &'static str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Transport(message));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(
        &self,
        method: &'static str,
        path: &str,
        body: Option<Value>,
        opts: RequestOpts,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body,
            requires_auth: opts.requires_auth,
        });
        match self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted reply for {method} {path}"))
        {
            Reply::Ok(value) => Ok(value),
            Reply::Remote(status, message) => Err(ApiError::Remote {
                status,
                message: message.to_string(),
            }),
            Reply::Transport(message) => Err(ApiError::Transport(message.to_string())),
        }
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn get(&self, path: &str, opts: RequestOpts) -> Result<Value, ApiError> {
        self.next("GET", path, None, opts)
    }

    async fn post(&self, path: &str, body: Value, opts: RequestOpts) -> Result<Value, ApiError> {
        self.next("POST", path, Some(body), opts)
    }

    async fn put(&self, path: &str, body: Value, opts: RequestOpts) -> Result<Value, ApiError> {
        self.next("PUT", path, Some(body), opts)
    }

    async fn delete(&self, path: &str, opts: RequestOpts) -> Result<Value, ApiError> {
        self.next("DELETE", path, None, opts)
    }
}

pub struct Harness {
    pub ctx: AppContext,
    pub api: Arc<ScriptedTransport>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Wire an `AppContext` over the scripted transport and recording notifier.
pub fn harness() -> Harness {
    let api = Arc::new(ScriptedTransport::default());
    let notifier = Arc::new(RecordingNotifier::new());
    let config = ClientConfig {
        api_base_url: "http://voc.test".to_string(),
        log: "info".to_string(),
        data_dir: PathBuf::from("."),
        timeout_secs: 5,
    };
    let ctx = AppContext::with_parts(
        config,
        Arc::clone(&api) as Arc<dyn ApiTransport>,
        Arc::new(CredentialStore::new()),
        Arc::clone(&notifier) as Arc<dyn vocc::notify::Notifier>,
    );
    Harness { ctx, api, notifier }
}
