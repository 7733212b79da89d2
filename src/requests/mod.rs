//! Customer-request domain: record model, collection store, view-model,
//! status transitions, and the controller tying them to the remote API.

pub mod controller;
pub mod record;
pub mod store;
pub mod transition;
pub mod view;

pub use controller::{RequestController, RequestDraft};
pub use record::{normalize, Priority, RequestKind, RequestRecord, RequestStatus};
pub use store::{RequestCollectionState, SharedRequestStore};
pub use transition::next_status;
pub use view::{derive, FilterState, PriorityFilter, RequestPage, StatusFilter, Tab, PAGE_SIZE};
