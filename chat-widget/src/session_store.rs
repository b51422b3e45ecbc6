// chat-widget/src/session_store.rs
use crate::clock::Clock;
use crate::storage::SessionStorage;
use common::config::ChatConfig;
use common::models::session::GuestSession;
use std::sync::Arc;

/// Creates, persists, expires, and mutates the anonymous session record.
///
/// Callers never observe an expired session: an inactive record is replaced
/// transparently by a fresh one with a new id and a zero message count.
pub struct GuestSessionStore {
    clock: Arc<dyn Clock>,
    storage: Arc<dyn SessionStorage>,
    config: ChatConfig,
}

impl GuestSessionStore {
    pub fn new(clock: Arc<dyn Clock>, storage: Arc<dyn SessionStorage>, config: ChatConfig) -> Self {
        Self {
            clock,
            storage,
            config,
        }
    }

    /// Load the persisted session, or create a fresh one if none exists or
    /// the stored record is no longer active. Idempotent between mutations:
    /// two successive calls return the same id and message count. The flag
    /// reports whether a fresh session was minted, so callers can emit the
    /// creation analytics event.
    pub fn get_or_create(&self) -> (GuestSession, bool) {
        if let Some(session) = self.storage.load() {
            if self.is_active(&session) {
                tracing::debug!("Resuming guest session: {}", session.id);
                return (session, false);
            }
            tracing::debug!("Guest session expired: {}", session.id);
        }

        let session = GuestSession::new(self.clock.now());
        self.storage.save(&session);
        tracing::info!("Created guest session: {}", session.id);
        (session, true)
    }

    /// Refresh the activity timestamp and persist.
    pub fn touch_activity(&self, session: &mut GuestSession) {
        session.touch(self.clock.now());
        self.storage.save(session);
    }

    /// Count one admitted message and persist. Invoked only after a message
    /// was actually dispatched, so rejected or failed sends never consume
    /// quota.
    pub fn record_message(&self, session: &mut GuestSession) {
        session.record_message(self.clock.now());
        self.storage.save(session);
        tracing::debug!(
            "Guest session {} message count: {}",
            session.id,
            session.message_count
        );
    }

    pub fn is_active(&self, session: &GuestSession) -> bool {
        session.is_active(
            self.clock.now(),
            self.config.inactivity_timeout(),
            self.config.window_duration(),
        )
    }

    /// Drop the persisted record. Called on the guest-to-authenticated
    /// context switch.
    pub fn invalidate(&self) {
        self.storage.clear();
        tracing::info!("Guest session invalidated");
    }
}
