// chat-widget/src/clock.rs
use chrono::{DateTime, Utc};

/// Wall-clock abstraction so session expiry and quota windows can be tested
/// without waiting on real time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
