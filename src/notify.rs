// SPDX-License-Identifier: MIT
//! Fire-and-forget notification surface (toasts).
//!
//! The core never consumes a return value from a toast beyond the handle a
//! loading toast hands back for dismissal. No subscribers is fine — the
//! production impl just emits tracing events; a UI shell can plug in its own.

use uuid::Uuid;

/// Handle to a loading toast, for later dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ToastId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-visible notification sink.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn loading(&self, message: &str) -> ToastId;
    fn dismiss(&self, id: ToastId);
}

/// Production notifier: toasts become tracing events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = "success", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(toast = "error", "{message}");
    }

    fn loading(&self, message: &str) -> ToastId {
        let id = ToastId::new();
        tracing::debug!(toast = "loading", toast_id = %id, "{message}");
        id
    }

    fn dismiss(&self, id: ToastId) {
        tracing::debug!(toast = "dismiss", toast_id = %id, "dismissed");
    }
}

/// Captures every toast for later inspection. Used by tests and headless
/// embedders that render notifications themselves.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: std::sync::Mutex<Vec<ToastEvent>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Success(String),
    Error(String),
    Loading(String),
    Dismiss,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ToastEvent> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }

    /// Error messages only, in emission order.
    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ToastEvent::Error(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ToastEvent) {
        self.events.lock().expect("notifier mutex poisoned").push(event);
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.push(ToastEvent::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(ToastEvent::Error(message.to_string()));
    }

    fn loading(&self, message: &str) -> ToastId {
        self.push(ToastEvent::Loading(message.to_string()));
        ToastId::new()
    }

    fn dismiss(&self, _id: ToastId) {
        self.push(ToastEvent::Dismiss);
    }
}
