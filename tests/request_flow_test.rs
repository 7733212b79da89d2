//! Request controller integration tests.
//!
//! These exercise the full pipeline over a scripted transport:
//!   controller → remote call → store dispatch → (view-model)
//! No network, no daemon — every remote outcome is canned.

mod support;

use serde_json::json;
use support::harness;
use vocc::error::ControllerError;
use vocc::notify::ToastEvent;
use vocc::requests::{derive, FilterState, RequestStatus};

fn raw_feature(id: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "title": format!("Feature {id}"),
        "type": "feature",
        "status": status,
        "priority": "high",
        "customerList": [{"id": "c1"}, {"id": "c2"}],
    })
}

// ─── Fetch ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_all_replaces_the_collection_in_input_order() {
    let h = harness();
    h.api.push_ok(json!([
        raw_feature("b", "open"),
        raw_feature("a", "open"),
        json!({}), // unnormalizable — becomes the sentinel row
    ]));

    let count = h.ctx.request_controller().fetch_all().await.unwrap();
    assert_eq!(count, 3);

    let state = h.ctx.requests.read().await;
    let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["b", "a", "unknown"]);
    assert_eq!(state.records[2].title, "Error loading request");
    assert!(!state.loading);
    assert_eq!(state.error, None);

    // The list endpoint is an authenticated call.
    let calls = h.api.calls();
    assert_eq!(calls[0].method, "GET");
    assert_eq!(calls[0].path, "/api/customer-requests");
    assert!(calls[0].requires_auth);
}

#[tokio::test]
async fn fetch_all_failure_keeps_records_and_surfaces_the_message() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("a", "open")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    h.api.push_remote(503, "service unavailable");
    let err = h.ctx.request_controller().fetch_all().await.unwrap_err();
    assert!(matches!(err, ControllerError::Api(_)));

    let state = h.ctx.requests.read().await;
    assert_eq!(state.records.len(), 1); // previous fetch untouched
    assert_eq!(state.error.as_deref(), Some("service unavailable"));
    assert!(!state.loading);
    assert_eq!(h.notifier.errors(), ["service unavailable"]);
}

#[tokio::test]
async fn fetch_one_sets_the_current_record() {
    let h = harness();
    h.api.push_ok(json!({ "request": raw_feature("r9", "review") }));

    let record = h.ctx.request_controller().fetch_one("r9").await.unwrap();
    assert_eq!(record.status, RequestStatus::Review);

    let state = h.ctx.requests.read().await;
    assert_eq!(state.current.as_ref().map(|r| r.id.as_str()), Some("r9"));
    assert_eq!(h.api.calls()[0].path, "/api/customer-requests/r9");
}

// ─── Create / update / delete ────────────────────────────────────────────────

#[tokio::test]
async fn create_appends_the_server_record() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("a", "open")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    h.api.push_ok(raw_feature("fresh", "pending"));
    let draft = vocc::requests::RequestDraft {
        title: "Feature fresh".into(),
        ..Default::default()
    };
    h.ctx.request_controller().create(&draft).await.unwrap();

    let state = h.ctx.requests.read().await;
    assert_eq!(
        state.records.last().map(|r| r.id.as_str()),
        Some("fresh"),
        "created record lands at the end"
    );
    assert!(h
        .notifier
        .events()
        .contains(&ToastEvent::Success("Request created".into())));
}

#[tokio::test]
async fn update_for_an_id_not_in_the_collection_is_silently_dropped() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("a", "open")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    // Server happily answers for a record this client never fetched.
    h.api.push_ok(raw_feature("ghost", "resolved"));
    let record = h
        .ctx
        .request_controller()
        .update("ghost", json!({ "status": "resolved" }))
        .await
        .unwrap();
    assert_eq!(record.id, "ghost");

    let state = h.ctx.requests.read().await;
    let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["a"], "no insertion, no error — the update vanishes");
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn delete_removes_every_entry_with_the_id() {
    let h = harness();
    h.api.push_ok(json!([
        raw_feature("dup", "open"),
        raw_feature("keep", "open"),
        raw_feature("dup", "open"),
    ]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    h.api.push_ok(json!(null));
    h.ctx.request_controller().delete("dup").await.unwrap();

    let state = h.ctx.requests.read().await;
    let ids: Vec<&str> = state.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["keep"]);
}

// ─── Advance status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn advance_puts_the_next_status_and_updates_after_success() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("r1", "open")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    h.api.push_ok(raw_feature("r1", "in-progress"));
    let next = h.ctx.request_controller().advance_status("r1").await.unwrap();
    assert_eq!(next, RequestStatus::InProgress);

    let calls = h.api.calls();
    let put = &calls[1];
    assert_eq!(put.method, "PUT");
    assert_eq!(put.path, "/api/customer-requests/r1");
    assert_eq!(put.body, Some(json!({ "status": "in-progress" })));

    let state = h.ctx.requests.read().await;
    assert_eq!(state.records[0].status, RequestStatus::InProgress);
}

#[tokio::test]
async fn advance_failure_leaves_the_record_unchanged() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("r1", "resolved")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    h.api.push_remote(500, "update rejected");
    let err = h
        .ctx
        .request_controller()
        .advance_status("r1")
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Api(_)));

    // No optimistic update: the stored record still reads resolved.
    let state = h.ctx.requests.read().await;
    assert_eq!(state.records[0].status, RequestStatus::Resolved);
    assert_eq!(state.error.as_deref(), Some("update rejected"));
}

#[tokio::test]
async fn advance_from_an_off_cycle_status_reenters_at_open() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("r1", "closed")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    h.api.push_ok(raw_feature("r1", "open"));
    let next = h.ctx.request_controller().advance_status("r1").await.unwrap();
    assert_eq!(next, RequestStatus::Open);
    assert_eq!(
        h.api.calls()[1].body,
        Some(json!({ "status": "open" })),
        "closed re-enters the cycle at open"
    );
}

#[tokio::test]
async fn advance_on_an_unknown_id_never_touches_the_network() {
    let h = harness();
    h.api.push_ok(json!([raw_feature("a", "open")]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    let err = h
        .ctx
        .request_controller()
        .advance_status("ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::UnknownRecord(_)));
    assert_eq!(h.api.calls().len(), 1, "only the initial fetch went out");
}

// ─── Store → view-model ──────────────────────────────────────────────────────

#[tokio::test]
async fn fetched_collection_drives_the_view_model() {
    let h = harness();
    h.api.push_ok(json!([
        raw_feature("1", "open"),
        json!({
            "_id": "2",
            "type": "issue",
            "status": "resolved",
            "priority": "low",
            "customerList": [],
        }),
    ]));
    h.ctx.request_controller().fetch_all().await.unwrap();

    let state = h.ctx.requests.read().await;
    let page = derive(&state.records, &FilterState::default());
    assert_eq!(page.filtered_count, 1);
    assert_eq!(page.visible[0].id, "1");
    assert_eq!(page.kind_counts.feature, 1);
    assert_eq!(page.kind_counts.issue, 1);
    assert_eq!(page.status_counts.resolved, 1);
}
