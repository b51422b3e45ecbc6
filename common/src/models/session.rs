// common/src/models/session.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anonymous session record for an unauthenticated visitor.
///
/// One record exists per browser context; it is the unit of identity and
/// message quota for guest interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSession {
    /// Unique session identifier, fixed for the session's life
    pub id: Uuid,
    /// Timestamp when the session was first created
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent admitted message or activity ping
    pub last_activity: DateTime<Utc>,
    /// Messages sent by this session since creation, never decremented
    pub message_count: u32,
}

impl GuestSession {
    /// Create a fresh session with a zero message count.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_activity: now,
            message_count: 0,
        }
    }

    /// Update the activity timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }

    /// Count one admitted message and refresh activity.
    pub fn record_message(&mut self, now: DateTime<Utc>) {
        self.message_count += 1;
        self.last_activity = now;
    }

    /// A session is active while it has neither idled out nor outlived
    /// its maximum lifetime.
    pub fn is_active(
        &self,
        now: DateTime<Utc>,
        inactivity_timeout: Duration,
        max_lifetime: Duration,
    ) -> bool {
        now.signed_duration_since(self.last_activity) < inactivity_timeout
            && now.signed_duration_since(self.created_at) < max_lifetime
    }
}
