//! Reconciler integration tests
//!
//! Exercises the reconciler against the in-memory gateway double:
//! counter monotonicity, tombstone exclusion, local fallback, delete
//! immediacy, and the delete-all sweep.

use quill_model::{StoryColor, StoryId, UserId};
use quill_sync::{DisplayId, RecordRef, StoryReconciler};
use quill_test_utils::{seed_story, tombstone, FixedIdentity, MemoryGateway, NoSession};
use std::sync::Arc;

fn reconciler_with(gateway: Arc<MemoryGateway>) -> StoryReconciler {
    StoryReconciler::new(gateway, Arc::new(FixedIdentity::new("user-1")))
}

fn user() -> UserId {
    UserId::from("user-1")
}

#[tokio::test]
async fn load_of_empty_store_yields_empty_list() {
    let gateway = Arc::new(MemoryGateway::new());
    let reconciler = reconciler_with(gateway);

    let items = reconciler.load(&user()).await.unwrap();
    assert!(items.is_empty());
    assert!(reconciler.snapshot().is_empty());
}

#[tokio::test]
async fn load_assigns_sequential_display_ids_in_store_order() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "Alpha", StoryColor::Green, "user-1", 1),
        seed_story("s-b", "Beta", StoryColor::Blue, "user-1", 4),
    ]));
    let reconciler = reconciler_with(gateway);

    let items = reconciler.load(&user()).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].display_id, DisplayId(1));
    assert_eq!(items[1].display_id, DisplayId(2));
    assert_eq!(items[0].title, "Alpha");
    assert_eq!(
        items[1].record,
        RecordRef::Remote {
            id: "s-b".into(),
            version: 4
        }
    );
}

#[tokio::test]
async fn load_is_idempotent_for_unchanged_remote_state() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "Alpha", StoryColor::Green, "user-1", 1),
        seed_story("s-b", "Beta", StoryColor::Blue, "user-1", 1),
    ]));
    let reconciler = reconciler_with(gateway);

    let first = reconciler.load(&user()).await.unwrap();
    let second = reconciler.load(&user()).await.unwrap();

    let titles_and_colors =
        |items: &[quill_sync::LocalStoryView]| -> Vec<(String, StoryColor)> {
            items.iter().map(|v| (v.title.clone(), v.color)).collect()
        };
    assert_eq!(titles_and_colors(&first), titles_and_colors(&second));
}

#[tokio::test]
async fn tombstoned_records_never_become_views() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "Alpha", StoryColor::Green, "user-1", 1),
        tombstone(seed_story("s-b", "Beta", StoryColor::Blue, "user-1", 1)),
    ]));
    let reconciler = reconciler_with(gateway);

    let items = reconciler.load(&user()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Alpha");
}

#[tokio::test]
async fn load_failure_surfaces_error_and_leaves_list_empty() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![seed_story(
        "s-a",
        "Alpha",
        StoryColor::Green,
        "user-1",
        1,
    )]));
    let reconciler = reconciler_with(gateway.clone());

    reconciler.load(&user()).await.unwrap();
    assert_eq!(reconciler.snapshot().len(), 1);

    gateway.set_fail_list(true);
    let err = reconciler.load(&user()).await.unwrap_err();
    assert!(!err.is_unauthenticated());
    assert!(reconciler.snapshot().is_empty());

    // Counter also reset: next create numbers from 1 again.
    gateway.set_fail_list(false);
    gateway.set_fail_create(true);
    let story = reconciler.create_story(&user()).await;
    assert_eq!(story.title, "New Story 1");
}

#[tokio::test]
async fn created_titles_are_unique_and_counter_advances_per_call() {
    let gateway = Arc::new(MemoryGateway::new());
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    // Mix of failed and successful creates; counter moves once each.
    gateway.set_fail_create(true);
    let first = reconciler.create_story(&user()).await;
    gateway.set_fail_create(false);
    let second = reconciler.create_story(&user()).await;
    gateway.set_fail_create(true);
    let third = reconciler.create_story(&user()).await;

    assert_eq!(first.title, "New Story 1");
    assert_eq!(second.title, "New Story 2");
    assert_eq!(third.title, "New Story 3");
    assert!(first.record.is_local());
    assert!(!second.record.is_local());
    assert!(third.record.is_local());

    let snapshot = reconciler.snapshot();
    assert_eq!(snapshot.len(), 3);
    let display_ids: Vec<_> = snapshot.items.iter().map(|v| v.display_id).collect();
    assert_eq!(display_ids, vec![DisplayId(1), DisplayId(2), DisplayId(3)]);
}

#[tokio::test]
async fn create_keeps_locally_computed_title_over_store_echo() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.set_mangle_titles(true);
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    let story = reconciler.create_story(&user()).await;
    assert_eq!(story.title, "New Story 1");

    // The store persisted its mutated title; the view did not follow it.
    assert_eq!(gateway.records()[0].title, "New Story 1 (edited)");
}

#[tokio::test]
async fn counter_never_regresses_after_deletions() {
    let gateway = Arc::new(MemoryGateway::new());
    let reconciler = reconciler_with(gateway);
    reconciler.load(&user()).await.unwrap();

    let first = reconciler.create_story(&user()).await;
    assert_eq!(first.title, "New Story 1");
    let second = reconciler.create_story(&user()).await;
    assert_eq!(second.title, "New Story 2");

    assert!(reconciler.request_delete(first.display_id));
    reconciler.confirm_delete().await.unwrap();

    let third = reconciler.create_story(&user()).await;
    assert_eq!(third.title, "New Story 3");
}

#[tokio::test]
async fn counter_seeds_from_highest_existing_title() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "New Story 2", StoryColor::Green, "user-1", 1),
        seed_story("s-b", "New Story 5", StoryColor::Blue, "user-1", 1),
        tombstone(seed_story("s-c", "New Story 9", StoryColor::Brown, "user-1", 1)),
    ]));
    let reconciler = reconciler_with(gateway);

    let items = reconciler.load(&user()).await.unwrap();
    assert_eq!(items.len(), 2);

    let next = reconciler.create_story(&user()).await;
    assert_eq!(next.title, "New Story 6");
}

#[tokio::test]
async fn local_fallback_delete_never_reaches_the_gateway() {
    let gateway = Arc::new(MemoryGateway::new());
    gateway.set_fail_create(true);
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    let story = reconciler.create_story(&user()).await;
    assert!(story.record.is_local());
    assert_eq!(story.title, "New Story 1");

    assert!(reconciler.request_delete(story.display_id));
    let removed = reconciler.confirm_delete().await.unwrap();
    assert_eq!(removed.display_id, story.display_id);

    assert!(reconciler.snapshot().is_empty());
    assert_eq!(gateway.delete_calls(), 0);
}

#[tokio::test]
async fn confirmed_delete_removes_record_even_when_store_fails() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![seed_story(
        "s-a",
        "Alpha",
        StoryColor::Green,
        "user-1",
        1,
    )]));
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    gateway.set_fail_delete(true);
    assert!(reconciler.request_delete(DisplayId(1)));
    let removed = reconciler.confirm_delete().await.unwrap();
    assert_eq!(removed.title, "Alpha");

    assert!(reconciler.snapshot().is_empty());
    assert_eq!(gateway.delete_calls(), 1);
}

#[tokio::test]
async fn confirmed_delete_submits_last_observed_version() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![seed_story(
        "s-a",
        "Alpha",
        StoryColor::Green,
        "user-1",
        3,
    )]));
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    assert!(reconciler.request_delete(DisplayId(1)));
    reconciler.confirm_delete().await.unwrap();

    // Version matched, so the store tombstoned the record.
    let records = gateway.records();
    assert!(records[0].is_tombstone());
    assert_eq!(records[0].version, 4);
}

#[tokio::test]
async fn pending_delete_is_single_slot() {
    let gateway = Arc::new(MemoryGateway::new());
    let reconciler = reconciler_with(gateway);
    reconciler.load(&user()).await.unwrap();

    let first = reconciler.create_story(&user()).await;
    let second = reconciler.create_story(&user()).await;

    assert!(reconciler.request_delete(first.display_id));
    assert!(reconciler.request_delete(second.display_id));
    assert_eq!(reconciler.snapshot().pending_delete, Some(second.display_id));

    let removed = reconciler.confirm_delete().await.unwrap();
    assert_eq!(removed.display_id, second.display_id);

    let snapshot = reconciler.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.items[0].display_id, first.display_id);
    assert!(snapshot.pending_delete.is_none());
}

#[tokio::test]
async fn cancel_delete_clears_intent_without_mutation() {
    let gateway = Arc::new(MemoryGateway::new());
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    let story = reconciler.create_story(&user()).await;
    assert!(reconciler.request_delete(story.display_id));
    reconciler.cancel_delete();

    let snapshot = reconciler.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.pending_delete.is_none());
    assert!(reconciler.confirm_delete().await.is_none());
    assert_eq!(gateway.delete_calls(), 0);
}

#[tokio::test]
async fn request_delete_for_unknown_record_is_refused() {
    let gateway = Arc::new(MemoryGateway::new());
    let reconciler = reconciler_with(gateway);
    reconciler.load(&user()).await.unwrap();

    assert!(!reconciler.request_delete(DisplayId(7)));
    assert!(reconciler.snapshot().pending_delete.is_none());
}

#[tokio::test]
async fn delete_all_clears_list_and_counter_despite_failures() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "New Story 1", StoryColor::Green, "user-1", 1),
        seed_story("s-b", "New Story 2", StoryColor::Blue, "user-1", 1),
        seed_story("s-c", "New Story 3", StoryColor::Brown, "user-1", 1),
    ]));
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();
    assert_eq!(reconciler.snapshot().len(), 3);

    gateway.set_fail_delete(true);
    let report = reconciler.delete_all(&user()).await;
    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 3);

    assert!(reconciler.snapshot().is_empty());

    // Counter reset to 1 regardless of the failed sweep.
    let story = reconciler.create_story(&user()).await;
    assert_eq!(story.title, "New Story 1");
}

#[tokio::test]
async fn delete_all_with_one_failing_record_still_clears_everything() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "New Story 1", StoryColor::Green, "user-1", 1),
        seed_story("s-b", "New Story 2", StoryColor::Blue, "user-1", 1),
        seed_story("s-c", "New Story 3", StoryColor::Brown, "user-1", 1),
    ]));
    gateway.set_fail_delete_for(StoryId::from("s-b"));
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    let report = reconciler.delete_all(&user()).await;
    assert_eq!(report.attempted, 3);
    assert_eq!(report.failed, 1);

    // The surviving deletes settled remotely; the failed one did not.
    let records = gateway.records();
    let by_id = |id: &str| records.iter().find(|r| r.id.as_str() == id).unwrap();
    assert!(by_id("s-a").is_tombstone());
    assert!(!by_id("s-b").is_tombstone());
    assert!(by_id("s-c").is_tombstone());

    // The list and counter reset regardless of the partial failure.
    assert!(reconciler.snapshot().is_empty());
    let story = reconciler.create_story(&user()).await;
    assert_eq!(story.title, "New Story 1");
}

#[tokio::test]
async fn delete_all_uses_authoritative_remote_list() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "New Story 1", StoryColor::Green, "user-1", 1),
        seed_story("s-b", "New Story 2", StoryColor::Blue, "user-1", 2),
    ]));
    let reconciler = reconciler_with(gateway.clone());
    // No load first: the sweep must not depend on in-memory state.

    let report = reconciler.delete_all(&user()).await;
    assert_eq!(report.attempted, 2);
    assert_eq!(report.failed, 0);

    assert!(gateway.records().iter().all(|r| r.is_tombstone()));
    assert_eq!(gateway.list_calls(), 1);
}

#[tokio::test]
async fn delete_all_skips_tombstones_in_the_sweep() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![
        seed_story("s-a", "New Story 1", StoryColor::Green, "user-1", 1),
        tombstone(seed_story("s-b", "New Story 2", StoryColor::Blue, "user-1", 1)),
    ]));
    let reconciler = reconciler_with(gateway.clone());

    let report = reconciler.delete_all(&user()).await;
    assert_eq!(report.attempted, 1);
    assert_eq!(gateway.delete_calls(), 1);
}

#[tokio::test]
async fn delete_all_absorbs_list_failure() {
    let gateway = Arc::new(MemoryGateway::with_records(vec![seed_story(
        "s-a",
        "New Story 1",
        StoryColor::Green,
        "user-1",
        1,
    )]));
    let reconciler = reconciler_with(gateway.clone());
    reconciler.load(&user()).await.unwrap();

    gateway.set_fail_list(true);
    let report = reconciler.delete_all(&user()).await;
    assert_eq!(report.attempted, 0);
    assert_eq!(gateway.delete_calls(), 0);
    assert!(reconciler.snapshot().is_empty());
}

#[tokio::test]
async fn missing_session_propagates_unauthenticated() {
    let reconciler = StoryReconciler::new(Arc::new(MemoryGateway::new()), Arc::new(NoSession));
    let err = reconciler.current_user_id().await.unwrap_err();
    assert!(err.is_unauthenticated());
}

#[tokio::test]
async fn current_user_id_resolves_signed_in_user() {
    let reconciler = reconciler_with(Arc::new(MemoryGateway::new()));
    let id = reconciler.current_user_id().await.unwrap();
    assert_eq!(id, user());
}
