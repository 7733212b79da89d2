// SPDX-License-Identifier: MIT
//! Pure filter/paginate view-model over the request collection.
//!
//! [`derive`] is a pure function from (records, [`FilterState`]) to one page
//! of visible records plus the derived counts the summary chips render. It
//! performs no I/O and holds no state — views recompute it whenever the
//! store or the filter inputs change.

use serde::Serialize;

use super::record::{Priority, RequestKind, RequestRecord, RequestStatus};

/// Records shown per page.
pub const PAGE_SIZE: usize = 12;

/// Top-level tab partition: tab 0 shows features, tab 1 shows issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Features,
    Issues,
}

impl Tab {
    pub fn from_index(index: usize) -> Tab {
        match index {
            0 => Tab::Features,
            _ => Tab::Issues,
        }
    }

    /// The record kind this tab admits.
    pub fn kind(self) -> RequestKind {
        match self {
            Tab::Features => RequestKind::Feature,
            Tab::Issues => RequestKind::Issue,
        }
    }
}

/// Status filter: everything, or one exact stored status value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StatusFilter {
    #[default]
    All,
    Is(RequestStatus),
}

/// Priority filter: everything, or one exact priority.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PriorityFilter {
    #[default]
    All,
    Is(Priority),
}

/// Filter and pagination inputs owned by the requests view. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub active_tab: Tab,
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub priority_filter: PriorityFilter,
    /// Inclusive customer-count range.
    pub customer_count_range: (usize, usize),
    /// 1-based. Not clamped here — see [`derive`].
    pub current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            active_tab: Tab::Features,
            search_term: String::new(),
            status_filter: StatusFilter::All,
            priority_filter: PriorityFilter::All,
            customer_count_range: (0, 10),
            current_page: 1,
        }
    }
}

impl FilterState {
    /// Reset everything to defaults (the explicit user "clear" action).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Switch tabs. Changing tab resets the page to 1.
    pub fn set_active_tab(&mut self, tab: Tab) {
        if self.active_tab != tab {
            self.current_page = 1;
        }
        self.active_tab = tab;
    }

    /// The full predicate: a record is visible iff every clause holds.
    pub fn matches(&self, record: &RequestRecord) -> bool {
        self.matches_tab(record)
            && self.matches_search(record)
            && self.matches_status(record)
            && self.matches_priority(record)
            && self.matches_customer_count(record)
    }

    fn matches_tab(&self, record: &RequestRecord) -> bool {
        record.kind == self.active_tab.kind()
    }

    fn matches_search(&self, record: &RequestRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        [
            record.title.as_str(),
            record.description.as_str(),
            record.customer_name.as_str(),
        ]
        .iter()
        .any(|hay| hay.to_lowercase().contains(&needle))
    }

    fn matches_status(&self, record: &RequestRecord) -> bool {
        match &self.status_filter {
            StatusFilter::All => true,
            StatusFilter::Is(status) => &record.status == status,
        }
    }

    fn matches_priority(&self, record: &RequestRecord) -> bool {
        match &self.priority_filter {
            PriorityFilter::All => true,
            PriorityFilter::Is(priority) => &record.priority == priority,
        }
    }

    /// A record with no customer data counts as having zero customers, so it
    /// passes only ranges that start at 0.
    fn matches_customer_count(&self, record: &RequestRecord) -> bool {
        let (min, max) = self.customer_count_range;
        match &record.customer_list {
            Some(list) => list.len() >= min && list.len() <= max,
            None => min == 0,
        }
    }
}

/// Per-kind counts over the unfiltered collection. Records whose kind is
/// neither feature nor issue are counted by neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub feature: usize,
    pub issue: usize,
}

/// Status counts for the summary chips, over the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub review: usize,
    pub resolved: usize,
}

/// One derived page of the collection.
#[derive(Debug, Clone, Serialize)]
pub struct RequestPage {
    pub visible: Vec<RequestRecord>,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub kind_counts: KindCounts,
    pub status_counts: StatusCounts,
}

/// Derive the visible page and counts from the collection and filter inputs.
///
/// `current_page` is taken as-is: a page past the end yields an empty
/// `visible` (never an error). Clamping is the caller's job and must come
/// from an explicit user action, not silent auto-correction. The derived
/// counts ignore the active tab and filters — they describe the whole
/// collection.
pub fn derive(records: &[RequestRecord], filter: &FilterState) -> RequestPage {
    let filtered: Vec<&RequestRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    let filtered_count = filtered.len();
    let total_pages = filtered_count.div_ceil(PAGE_SIZE);

    let start = filter
        .current_page
        .saturating_sub(1)
        .saturating_mul(PAGE_SIZE);
    let visible: Vec<RequestRecord> = filtered
        .iter()
        .skip(start)
        .take(PAGE_SIZE)
        .map(|r| (*r).clone())
        .collect();

    let mut kind_counts = KindCounts::default();
    let mut status_counts = StatusCounts::default();
    for record in records {
        match record.kind {
            RequestKind::Feature => kind_counts.feature += 1,
            RequestKind::Issue => kind_counts.issue += 1,
            RequestKind::Other(_) => {}
        }
        match record.status {
            RequestStatus::Review => status_counts.review += 1,
            RequestStatus::Resolved => status_counts.resolved += 1,
            _ => {}
        }
    }

    RequestPage {
        visible,
        total_pages,
        filtered_count,
        kind_counts,
        status_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::record::normalize;
    use serde_json::json;

    fn feature(id: &str) -> RequestRecord {
        normalize(&json!({
            "_id": id,
            "type": "feature",
            "status": "open",
            "priority": "high",
            "customerList": [{"id": "c1"}, {"id": "c2"}],
        }))
    }

    fn issue(id: &str) -> RequestRecord {
        normalize(&json!({
            "_id": id,
            "type": "issue",
            "status": "resolved",
            "priority": "low",
            "customerList": [],
        }))
    }

    #[test]
    fn feature_tab_with_open_filters_shows_the_feature() {
        let records = vec![feature("1"), issue("2")];
        let filter = FilterState::default();

        let page = derive(&records, &filter);
        assert_eq!(page.filtered_count, 1);
        assert_eq!(page.visible.len(), 1);
        assert_eq!(page.visible[0].id, "1");
    }

    #[test]
    fn customer_range_starting_above_zero_excludes_empty_lists() {
        let records = vec![feature("1"), issue("2")];
        let mut filter = FilterState::default();
        filter.customer_count_range = (1, 10);

        // The feature (2 customers) survives its own tab; the issue (0
        // customers) is excluded from the issues tab.
        let page = derive(&records, &filter);
        assert_eq!(page.filtered_count, 1);
        assert_eq!(page.visible[0].id, "1");

        filter.set_active_tab(Tab::Issues);
        let page = derive(&records, &filter);
        assert_eq!(page.filtered_count, 0);
    }

    #[test]
    fn missing_customer_data_passes_only_zero_based_ranges() {
        let record = normalize(&json!({ "_id": "1", "type": "feature" }));
        assert!(record.customer_list.is_none());

        let mut filter = FilterState::default();
        assert!(filter.matches(&record));

        filter.customer_count_range = (1, 10);
        assert!(!filter.matches(&record));
    }

    #[test]
    fn search_is_case_insensitive_across_title_description_customer() {
        let record = normalize(&json!({
            "_id": "1",
            "type": "feature",
            "title": "Dark mode",
            "description": "Requested via NPS survey",
            "customerName": "Globex",
        }));
        let mut filter = FilterState::default();

        for term in ["dark", "NPS", "globex"] {
            filter.search_term = term.to_string();
            assert!(filter.matches(&record), "term {term:?} should match");
        }

        filter.search_term = "tps report".to_string();
        assert!(!filter.matches(&record));
    }

    #[test]
    fn status_filter_compares_the_stored_value_exactly() {
        // A record stored as "pending" does not match an "open" filter even
        // though its UI label is "open".
        let record = normalize(&json!({ "_id": "1", "type": "feature", "status": "pending" }));
        let mut filter = FilterState::default();

        filter.status_filter = StatusFilter::Is(RequestStatus::Open);
        assert!(!filter.matches(&record));

        filter.status_filter = StatusFilter::Is(RequestStatus::Pending);
        assert!(filter.matches(&record));
    }

    #[test]
    fn pagination_slices_without_clamping() {
        let records: Vec<RequestRecord> = (0..30).map(|i| feature(&format!("r{i}"))).collect();
        let mut filter = FilterState::default();

        let page = derive(&records, &filter);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.visible.len(), PAGE_SIZE);

        filter.current_page = 3;
        let page = derive(&records, &filter);
        assert_eq!(page.visible.len(), 30 - 2 * PAGE_SIZE);

        // Past the end: empty, not an error, not clamped back.
        filter.current_page = 9;
        let page = derive(&records, &filter);
        assert!(page.visible.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn counts_cover_the_unfiltered_collection() {
        let records = vec![
            feature("1"),
            issue("2"),
            normalize(&json!({ "_id": "3", "type": "bug", "status": "review" })),
        ];
        let mut filter = FilterState::default();
        filter.search_term = "no such thing".to_string();

        let page = derive(&records, &filter);
        assert_eq!(page.filtered_count, 0);
        // Unknown kind "bug" is counted by neither chip.
        assert_eq!(page.kind_counts, KindCounts { feature: 1, issue: 1 });
        assert_eq!(
            page.status_counts,
            StatusCounts { review: 1, resolved: 1 }
        );
    }

    #[test]
    fn changing_tab_resets_the_page() {
        let mut filter = FilterState::default();
        filter.current_page = 4;
        filter.set_active_tab(Tab::Features); // same tab — page kept
        assert_eq!(filter.current_page, 4);
        filter.set_active_tab(Tab::Issues);
        assert_eq!(filter.current_page, 1);
    }

    #[test]
    fn clear_restores_defaults() {
        let mut filter = FilterState::default();
        filter.search_term = "export".into();
        filter.current_page = 7;
        filter.customer_count_range = (3, 5);
        filter.clear();
        assert_eq!(filter, FilterState::default());
    }

    #[test]
    fn empty_collection_derives_an_empty_page() {
        let page = derive(&[], &FilterState::default());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.filtered_count, 0);
        assert!(page.visible.is_empty());
    }
}
