use crate::modules::history::adapters::outbound::read_service_http::HttpReadService;
use crate::modules::history::core::errors::HistoryError;
use crate::modules::history::core::settings::TrackerSettings;
use crate::modules::history::use_cases::track_reads::tracker::ReadTracker;
use crate::shared::core::clock::FixedClock;
use crate::shared::core::primitives::NEVER_READ;
use crate::shared::infrastructure::local_store::in_memory::InMemoryLocalStore;
use crate::shell::state::AppState;
use crate::tests::fixtures::{DAY, NOW, USER, item, snapshot_of, spawn_service};
use std::sync::Arc;
use std::time::Duration;

type HttpTracker = ReadTracker<HttpReadService, InMemoryLocalStore>;

fn tracker_for(
    base_url: &str,
    settings: TrackerSettings,
    store: Arc<InMemoryLocalStore>,
    clock: Arc<FixedClock>,
) -> HttpTracker {
    let settings = settings.with_request_timeout(Duration::from_secs(5));
    let service = HttpReadService::for_settings(base_url, &settings).unwrap();
    ReadTracker::new(settings, Arc::new(service), store, clock)
}

#[tokio::test]
async fn tracks_reads_against_the_read_timestamp_service() {
    let clock = Arc::new(FixedClock::new(NOW));
    let base_url = spawn_service(AppState::in_memory(clock.clone())).await;
    let store = Arc::new(InMemoryLocalStore::new());
    let tracker = tracker_for(
        &base_url,
        TrackerSettings::for_user(USER),
        store.clone(),
        clock.clone(),
    );

    assert_eq!(tracker.get_last_read(&item("42")), NEVER_READ);

    let read_at = tracker.mark_as_read(&item("42")).await.unwrap();
    assert_eq!(read_at, NOW);
    assert_eq!(tracker.get_last_read(&item("42")), NOW);

    assert!(tracker.needs_server_check(&item("42"), NOW + 500));
    assert!(!tracker.needs_server_check(&item("42"), NOW - 1));
    assert!(!tracker.needs_server_check(&item("42"), NOW - 31 * DAY));
}

#[tokio::test]
async fn fetches_timestamps_recorded_by_another_session() {
    let clock = Arc::new(FixedClock::new(NOW));
    let base_url = spawn_service(AppState::in_memory(clock.clone())).await;

    let first_session = tracker_for(
        &base_url,
        TrackerSettings::for_user(USER),
        Arc::new(InMemoryLocalStore::new()),
        clock.clone(),
    );
    first_session.mark_as_read(&item("42")).await.unwrap();
    clock.advance(60);
    first_session.mark_as_read(&item("43")).await.unwrap();

    let second_session = tracker_for(
        &base_url,
        TrackerSettings::for_user(USER),
        Arc::new(InMemoryLocalStore::new()),
        clock.clone(),
    );
    assert_eq!(second_session.get_last_read(&item("42")), NEVER_READ);

    second_session
        .fetch_timestamps(&[item("42"), item("43"), item("44")])
        .await
        .unwrap();

    assert_eq!(second_session.get_last_read(&item("42")), NOW);
    assert_eq!(second_session.get_last_read(&item("43")), NOW + 60);
    assert_eq!(second_session.get_last_read(&item("44")), NEVER_READ);
}

#[tokio::test]
async fn keeps_read_history_per_user() {
    let clock = Arc::new(FixedClock::new(NOW));
    let base_url = spawn_service(AppState::in_memory(clock.clone())).await;
    let shared_store = Arc::new(InMemoryLocalStore::new());

    let reader = tracker_for(
        &base_url,
        TrackerSettings::for_user(USER),
        shared_store.clone(),
        clock.clone(),
    );
    reader.mark_as_read(&item("42")).await.unwrap();

    let other = tracker_for(
        &base_url,
        TrackerSettings::for_user("8"),
        shared_store,
        clock.clone(),
    );
    other.fetch_timestamps(&[item("42")]).await.unwrap();

    assert_eq!(reader.get_last_read(&item("42")), NOW);
    assert_eq!(other.get_last_read(&item("42")), NEVER_READ);
}

#[tokio::test]
async fn prefers_the_embedded_snapshot_over_the_service() {
    let clock = Arc::new(FixedClock::new(NOW));
    let base_url = spawn_service(AppState::in_memory(clock.clone())).await;
    let store = Arc::new(InMemoryLocalStore::new());
    let tracker = tracker_for(
        &base_url,
        TrackerSettings::for_user(USER).with_snapshot(snapshot_of(&[("42", NOW - DAY)])),
        store.clone(),
        clock.clone(),
    );

    tracker.fetch_timestamps(&[item("42")]).await.unwrap();
    assert_eq!(tracker.get_last_read(&item("42")), NOW - DAY);

    assert_eq!(tracker.mark_as_read(&item("42")).await.unwrap(), NOW);
    assert_eq!(tracker.get_last_read(&item("42")), NOW - DAY);
    assert!(store.is_empty());
}

#[tokio::test]
async fn marks_pending_items_after_page_load() {
    let clock = Arc::new(FixedClock::new(NOW));
    let base_url = spawn_service(AppState::in_memory(clock.clone())).await;
    let tracker = Arc::new(tracker_for(
        &base_url,
        TrackerSettings::for_user(USER).with_pending_mark_as_read(vec![item("42"), item("43")]),
        Arc::new(InMemoryLocalStore::new()),
        clock.clone(),
    ));

    let mut results = tracker.mark_pending_as_read().await;
    results.sort_by(|(left, _), (right, _)| left.cmp(right));

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, result)| matches!(result, Ok(NOW))));
    assert_eq!(tracker.get_last_read(&item("43")), NOW);
}

#[tokio::test]
async fn surfaces_an_unreachable_service() {
    let clock = Arc::new(FixedClock::new(NOW));
    let tracker = tracker_for(
        "http://127.0.0.1:9/",
        TrackerSettings::for_user(USER),
        Arc::new(InMemoryLocalStore::new()),
        clock,
    );

    let result = tracker.mark_as_read(&item("42")).await;

    assert!(matches!(result, Err(HistoryError::RemoteUnavailable(_))));
    assert_eq!(tracker.get_last_read(&item("42")), NEVER_READ);
}
