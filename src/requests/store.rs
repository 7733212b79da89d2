//! Request collection store: the in-memory holder of all fetched records
//! plus request-status metadata.
//!
//! Every operation is a synchronous whole-state mutation — controllers call
//! them in response to asynchronous API outcomes, so for a single action
//! `start_operation` is always observed before its terminal dispatch, and no
//! two mutations ever interleave mid-operation. The store performs no I/O;
//! callers own the remote calls and translate each outcome into exactly one
//! of the operations below.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::record::RequestRecord;

/// Shared handle to the collection state. Any number of views may read it;
/// only controllers mutate.
pub type SharedRequestStore = Arc<RwLock<RequestCollectionState>>;

/// The request collection plus operation metadata.
///
/// `records` keeps insertion order (fetch/creation order) — nothing here
/// re-sorts. `error` is cleared at the start of every operation and set only
/// on failure; `loading` is true exactly while an operation's outcome is
/// pending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestCollectionState {
    pub records: Vec<RequestRecord>,
    pub current: Option<RequestRecord>,
    pub loading: bool,
    pub error: Option<String>,
}

impl RequestCollectionState {
    /// Create an empty, shareable store — the state at application start.
    pub fn shared() -> SharedRequestStore {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Begin an operation: raise `loading`, clear any previous error.
    pub fn start_operation(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Wholesale replace the collection with a freshly fetched list.
    /// Ordering is the input ordering.
    pub fn replace_all(&mut self, records: Vec<RequestRecord>) {
        self.loading = false;
        self.records = records;
    }

    /// Store the most-recently-fetched single record.
    pub fn set_current(&mut self, record: RequestRecord) {
        self.loading = false;
        self.current = Some(record);
    }

    /// Push a newly created record to the end of the collection.
    pub fn append(&mut self, record: RequestRecord) {
        self.loading = false;
        self.records.push(record);
    }

    /// Replace the first record whose id matches, in place (position
    /// unchanged). A record with no match in the collection is silently
    /// dropped — no insertion, no error.
    pub fn update_by_id(&mut self, record: RequestRecord) {
        self.loading = false;
        if let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) {
            *slot = record;
        }
    }

    /// Remove every record whose id matches — not just the first.
    pub fn remove_by_id(&mut self, id: &str) {
        self.loading = false;
        self.records.retain(|r| r.id != id);
    }

    /// Terminal failure: drop `loading`, record the message. The collection
    /// itself is left untouched — no partial application.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Look up a record by id (first match).
    pub fn get(&self, id: &str) -> Option<&RequestRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}
