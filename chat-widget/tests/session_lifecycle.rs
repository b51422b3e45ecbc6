// chat-widget/tests/session_lifecycle.rs
mod support;

use chat_widget::analytics::AnalyticsRecorder;
use chat_widget::clock::Clock;
use chat_widget::context::AuthState;
use chat_widget::controller::{ChatController, SubmitOutcome, WidgetState};
use chat_widget::session_store::GuestSessionStore;
use chat_widget::storage::{MemoryStorage, SessionStorage};
use common::config::ChatConfig;
use std::sync::Arc;
use support::{BrokenStorage, CapturingSink, ManualClock, ScriptedTransport};

fn store_with(
    clock: Arc<ManualClock>,
    storage: Arc<dyn SessionStorage>,
    config: ChatConfig,
) -> GuestSessionStore {
    GuestSessionStore::new(clock, storage, config)
}

#[test]
fn get_or_create_is_idempotent_between_mutations() {
    let clock = Arc::new(ManualClock::at_epoch());
    let store = store_with(
        clock,
        Arc::new(MemoryStorage::new()),
        ChatConfig::default(),
    );

    let (first, created) = store.get_or_create();
    assert!(created);
    let (second, created) = store.get_or_create();
    assert!(!created);

    assert_eq!(first.id, second.id);
    assert_eq!(first.message_count, second.message_count);
}

#[test]
fn scenario_b_idle_session_is_renewed_with_fresh_quota() {
    let clock = Arc::new(ManualClock::at_epoch());
    let config = ChatConfig::default();
    let store = store_with(clock.clone(), Arc::new(MemoryStorage::new()), config.clone());

    let (mut original, _) = store.get_or_create();
    store.record_message(&mut original);
    store.record_message(&mut original);
    assert_eq!(original.message_count, 2);

    // No activity for 31 minutes against a 30 minute timeout
    clock.advance(config.inactivity_timeout() + chrono::Duration::minutes(1));

    let (renewed, created) = store.get_or_create();
    assert!(created);
    assert_ne!(renewed.id, original.id);
    assert_eq!(renewed.message_count, 0);
}

#[test]
fn continual_activity_cannot_outlive_the_max_lifetime() {
    let clock = Arc::new(ManualClock::at_epoch());
    // Generous idle allowance so only the lifetime clock can expire it
    let config = ChatConfig {
        inactivity_timeout_secs: 48 * 3600,
        window_duration_secs: 24 * 3600,
        ..ChatConfig::default()
    };
    let store = store_with(clock.clone(), Arc::new(MemoryStorage::new()), config);

    let (mut session, _) = store.get_or_create();
    for _ in 0..25 {
        clock.advance(chrono::Duration::hours(1));
        store.touch_activity(&mut session);
    }

    // lastActivity is fresh but createdAt is 25 hours old
    let (renewed, created) = store.get_or_create();
    assert!(created);
    assert_ne!(renewed.id, session.id);
}

#[test]
fn invalidate_drops_the_persisted_record() {
    let clock = Arc::new(ManualClock::at_epoch());
    let storage = Arc::new(MemoryStorage::new());
    let store = store_with(clock, storage.clone(), ChatConfig::default());

    let (session, _) = store.get_or_create();
    assert!(storage.load().is_some());

    store.invalidate();
    assert!(storage.load().is_none());

    // The next fetch mints a brand new session
    let (next, created) = store.get_or_create();
    assert!(created);
    assert_ne!(next.id, session.id);
}

#[test]
fn touch_activity_moves_only_the_idle_clock() {
    let clock = Arc::new(ManualClock::at_epoch());
    let store = store_with(
        clock.clone(),
        Arc::new(MemoryStorage::new()),
        ChatConfig::default(),
    );

    let (mut session, _) = store.get_or_create();
    let created_at = session.created_at;

    clock.advance(chrono::Duration::minutes(10));
    store.touch_activity(&mut session);

    assert_eq!(session.created_at, created_at);
    assert_eq!(session.last_activity, clock.now());
    assert_eq!(session.message_count, 0);
}

#[tokio::test]
async fn broken_storage_degrades_to_an_ephemeral_session() {
    let clock = Arc::new(ManualClock::at_epoch());
    let transport = Arc::new(ScriptedTransport::default());
    let sink = Arc::new(CapturingSink::default());
    let config = ChatConfig::default();

    let sessions = store_with(clock.clone(), Arc::new(BrokenStorage), config.clone());
    let mut controller = ChatController::new(
        config,
        AuthState::default(),
        clock,
        transport.clone(),
        sessions,
        AnalyticsRecorder::new(sink),
    );

    // Storage never holds anything, yet the widget works end to end
    controller.open();
    assert_eq!(controller.state(), WidgetState::Idle);

    let outcome = controller.submit("still works?").await;
    assert_eq!(outcome, SubmitOutcome::Delivered);
    assert_eq!(controller.remaining(), Some(19));
    assert_eq!(transport.guest_requests.lock().unwrap().len(), 1);
}

#[test]
fn broken_storage_store_never_panics() {
    let clock = Arc::new(ManualClock::at_epoch());
    let store = store_with(clock, Arc::new(BrokenStorage), ChatConfig::default());

    let (mut session, created) = store.get_or_create();
    assert!(created);
    store.record_message(&mut session);
    store.touch_activity(&mut session);
    store.invalidate();
    assert_eq!(session.message_count, 1);
}
