//! Request controller: issues remote calls and translates each outcome into
//! store dispatches.
//!
//! Every operation follows the same shape — `start_operation`, one remote
//! call, then exactly one terminal dispatch (`replace_all` / `set_current` /
//! `append` / `update_by_id` / `remove_by_id` on success, `fail` on error).
//! Nothing is retried automatically; a retry is always a fresh user action.
//!
//! Overlapping fetches carry no fencing: whichever completes last overwrites
//! shared state. Attaching a monotonic sequence number and keeping only the
//! newest terminal dispatch would close that race, but it is not part of the
//! current contract.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::api::{paths, ApiTransport, RequestOpts};
use crate::error::{ApiError, ControllerError};
use crate::notify::Notifier;

use super::record::{normalize, Priority, RequestKind, RequestRecord, RequestStatus};
use super::store::SharedRequestStore;
use super::transition::next_status;

/// Input for creating a request. Kind and priority default the same way the
/// normalizer defaults them.
#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub title: String,
    pub description: String,
    pub kind: RequestKind,
    pub priority: Priority,
    pub customer_name: Option<String>,
}

pub struct RequestController {
    api: Arc<dyn ApiTransport>,
    store: SharedRequestStore,
    notifier: Arc<dyn Notifier>,
}

impl RequestController {
    pub fn new(
        api: Arc<dyn ApiTransport>,
        store: SharedRequestStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
        }
    }

    /// Fetch the full list and replace the collection wholesale.
    /// Returns the record count.
    pub async fn fetch_all(&self) -> Result<usize, ControllerError> {
        self.store.write().await.start_operation();
        match self.api.get(paths::REQUESTS, RequestOpts::authed()).await {
            Ok(body) => {
                let records: Vec<RequestRecord> =
                    collect_raw_records(&body).iter().map(normalize).collect();
                let count = records.len();
                self.store.write().await.replace_all(records);
                debug!(count, "request list refreshed");
                Ok(count)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Fetch one record and store it as the current record.
    pub async fn fetch_one(&self, id: &str) -> Result<RequestRecord, ControllerError> {
        self.store.write().await.start_operation();
        match self.api.get(&paths::request(id), RequestOpts::authed()).await {
            Ok(body) => {
                let record = normalize(unwrap_record(&body));
                self.store.write().await.set_current(record.clone());
                Ok(record)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Create a request; the server's record is appended to the collection.
    pub async fn create(&self, draft: &RequestDraft) -> Result<RequestRecord, ControllerError> {
        self.store.write().await.start_operation();
        let body = json!({
            "title": draft.title,
            "description": draft.description,
            "type": draft.kind.as_str(),
            "priority": draft.priority.as_str(),
            "customerName": draft.customer_name,
        });
        match self.api.post(paths::REQUESTS, body, RequestOpts::authed()).await {
            Ok(body) => {
                let record = normalize(unwrap_record(&body));
                self.store.write().await.append(record.clone());
                self.notifier.success("Request created");
                Ok(record)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Apply a partial update. The collection is touched only after the
    /// remote call succeeds; a returned record whose id is not in the
    /// collection is silently dropped by the store.
    pub async fn update(&self, id: &str, patch: Value) -> Result<RequestRecord, ControllerError> {
        self.store.write().await.start_operation();
        match self
            .api
            .put(&paths::request(id), patch, RequestOpts::authed())
            .await
        {
            Ok(body) => {
                let record = normalize(unwrap_record(&body));
                self.store.write().await.update_by_id(record.clone());
                self.notifier.success("Request updated");
                Ok(record)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Delete a request; every collection entry with the id is removed.
    pub async fn delete(&self, id: &str) -> Result<(), ControllerError> {
        self.store.write().await.start_operation();
        match self
            .api
            .delete(&paths::request(id), RequestOpts::authed())
            .await
        {
            Ok(_) => {
                self.store.write().await.remove_by_id(id);
                self.notifier.success("Request deleted");
                Ok(())
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Advance a request one step along the status cycle.
    ///
    /// The next status is computed from the *stored* record, and the store
    /// is updated only after the remote `PUT` succeeds — no optimistic
    /// update. A failure leaves the record exactly as it was and surfaces
    /// the error.
    pub async fn advance_status(&self, id: &str) -> Result<RequestStatus, ControllerError> {
        let current = self
            .store
            .read()
            .await
            .get(id)
            .map(|r| r.status.clone())
            .ok_or_else(|| ControllerError::UnknownRecord(id.to_string()))?;
        let next = next_status(&current);

        self.store.write().await.start_operation();
        let body = json!({ "status": next.as_str() });
        match self
            .api
            .put(&paths::request(id), body, RequestOpts::authed())
            .await
        {
            Ok(body) => {
                let record = normalize(unwrap_record(&body));
                self.store.write().await.update_by_id(record);
                self.notifier
                    .success(&format!("Status changed to {}", next.label()));
                Ok(next)
            }
            Err(err) => Err(self.fail(err).await),
        }
    }

    async fn fail(&self, err: ApiError) -> ControllerError {
        let message = err.to_string();
        self.store.write().await.fail(&message);
        self.notifier.error(&message);
        warn!(%message, "request operation failed");
        ControllerError::Api(err)
    }
}

/// The list endpoint answers a bare array; some deployments wrap it as
/// `{"requests": [...]}` or `{"data": [...]}`. Anything else is an empty
/// list, never an error.
fn collect_raw_records(body: &Value) -> Vec<Value> {
    if let Some(items) = body.as_array() {
        return items.clone();
    }
    for key in ["requests", "data"] {
        if let Some(items) = body.get(key).and_then(Value::as_array) {
            return items.clone();
        }
    }
    Vec::new()
}

/// Single-record endpoints answer the record directly or as `{"request": ...}`.
fn unwrap_record(body: &Value) -> &Value {
    body.get("request").unwrap_or(body)
}
