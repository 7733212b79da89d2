//! Deterministic status rotation behind the "advance status" action.

use super::record::RequestStatus;

/// Next status in the advance cycle: `open → in-progress → resolved → open`.
///
/// Total — every value outside the cycle (`pending`, `closed`, `review`,
/// unknown raw values) re-enters it at `open`.
pub fn next_status(current: &RequestStatus) -> RequestStatus {
    match current {
        RequestStatus::Open => RequestStatus::InProgress,
        RequestStatus::InProgress => RequestStatus::Resolved,
        RequestStatus::Resolved => RequestStatus::Open,
        _ => RequestStatus::Open,
    }
}
