// chat-widget/tests/support/mod.rs
#![allow(dead_code)]
use async_trait::async_trait;
use chat_widget::analytics::{AnalyticsEvent, AnalyticsSink, EventKind};
use chat_widget::clock::Clock;
use chat_widget::storage::SessionStorage;
use chat_widget::transport::{ChatTransport, TransportError};
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::messages::{AuthenticatedChatRequest, ChatResponse, GuestChatRequest};
use common::models::session::GuestSession;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Deterministic clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn at_epoch() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Storage that always fails, standing in for a disabled browser store.
#[derive(Default)]
pub struct BrokenStorage;

impl SessionStorage for BrokenStorage {
    fn load(&self) -> Option<GuestSession> {
        None
    }

    fn save(&self, _session: &GuestSession) {}

    fn clear(&self) {}
}

/// Transport that replays scripted results and records every request it
/// receives. With no script queued it answers with a fixed acknowledgment.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<ChatResponse, TransportError>>>,
    pub guest_requests: Mutex<Vec<GuestChatRequest>>,
    pub authenticated_requests: Mutex<Vec<AuthenticatedChatRequest>>,
}

impl ScriptedTransport {
    pub fn push_ok(&self, response: ChatResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_err(&self) {
        self.script.lock().unwrap().push_back(Err(TransportError::Status(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        )));
    }

    pub fn total_calls(&self) -> usize {
        self.guest_requests.lock().unwrap().len()
            + self.authenticated_requests.lock().unwrap().len()
    }

    fn next_result(&self) -> Result<ChatResponse, TransportError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ChatResponse {
                    response: "ack".to_string(),
                    conversation_id: Some("conv-1".to_string()),
                })
            })
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn send_guest(&self, request: GuestChatRequest) -> Result<ChatResponse, TransportError> {
        self.guest_requests.lock().unwrap().push(request);
        self.next_result()
    }

    async fn send_authenticated(
        &self,
        request: AuthenticatedChatRequest,
    ) -> Result<ChatResponse, TransportError> {
        self.authenticated_requests.lock().unwrap().push(request);
        self.next_result()
    }
}

/// Sink that captures everything recorded.
#[derive(Default)]
pub struct CapturingSink {
    pub events: Mutex<Vec<AnalyticsEvent>>,
}

impl CapturingSink {
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.lock().unwrap().iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl AnalyticsSink for CapturingSink {
    fn record(&self, event: AnalyticsEvent) {
        self.events.lock().unwrap().push(event);
    }
}
