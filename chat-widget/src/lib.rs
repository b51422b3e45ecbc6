pub mod analytics;
pub mod clock;
pub mod context;
pub mod controller;
pub mod rate_limiter;
pub mod session_store;
pub mod storage;
pub mod transport;

pub use analytics::{AnalyticsEvent, AnalyticsRecorder, AnalyticsSink, EventKind, TracingSink};
pub use clock::{Clock, SystemClock};
pub use context::{resolve, AuthState, ChatContext};
pub use controller::{ChatController, SubmitOutcome, WidgetState};
pub use rate_limiter::{evaluate, RateLimitDecision, RATE_LIMIT_MESSAGE};
pub use session_store::GuestSessionStore;
pub use storage::{JsonFileStorage, MemoryStorage, SessionStorage};
pub use transport::{ChatTransport, HttpChatTransport, TransportError};
