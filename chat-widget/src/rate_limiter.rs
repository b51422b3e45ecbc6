// chat-widget/src/rate_limiter.rs
use chrono::{DateTime, Utc};
use common::config::ChatConfig;
use common::models::session::GuestSession;

/// User-facing denial copy, deliberately distinct from generic error text.
pub const RATE_LIMIT_MESSAGE: &str =
    "You've reached the message limit for this session. Sign up for unlimited messages.";

/// Outcome of a quota check. Derived from session state, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// When the counting window resets, anchored to session creation
    pub reset_time: DateTime<Utc>,
    /// Denial reason, present only when `allowed` is false
    pub message: Option<String>,
}

/// Decide whether this session may send another message.
///
/// Pure: never mutates the session. Incrementing the message count is the
/// session store's job, performed only after a successful dispatch.
pub fn evaluate(session: &GuestSession, now: DateTime<Utc>, config: &ChatConfig) -> RateLimitDecision {
    let active = session.is_active(now, config.inactivity_timeout(), config.window_duration());
    let allowed = session.message_count < config.max_messages && active;
    let remaining = config.max_messages.saturating_sub(session.message_count);

    RateLimitDecision {
        allowed,
        remaining,
        reset_time: session.created_at + config.window_duration(),
        message: (!allowed).then(|| RATE_LIMIT_MESSAGE.to_string()),
    }
}
