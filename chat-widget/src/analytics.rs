// chat-widget/src/analytics.rs
use crate::context::ChatContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// Lifecycle and message events recorded for guest conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SessionCreated,
    MessageSent,
    MessageReceived,
    MessageError,
}

/// A single analytics event. Payloads carry derived metrics only
/// (message length, conversation length) so guest-entered text never leaks
/// into analytics storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub kind: EventKind,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// Delivery mechanism for analytics events, supplied by the host.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: AnalyticsEvent);
}

/// Sink that emits events as structured tracing fields.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&self, event: AnalyticsEvent) {
        tracing::info!(
            kind = ?event.kind,
            payload = %event.payload,
            "analytics event"
        );
    }
}

/// Records session lifecycle and message events, active only in the guest
/// context. Every call under the authenticated context is a strict no-op:
/// nothing reaches the sink.
pub struct AnalyticsRecorder {
    sink: Arc<dyn AnalyticsSink>,
    context: ChatContext,
}

impl AnalyticsRecorder {
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            sink,
            context: ChatContext::Guest,
        }
    }

    /// Track the identity context currently governing the conversation.
    pub fn set_context(&mut self, context: ChatContext) {
        self.context = context;
    }

    pub fn record(&self, kind: EventKind, payload: Value, now: DateTime<Utc>) {
        if !self.context.is_guest() {
            return;
        }

        self.sink.record(AnalyticsEvent {
            kind,
            payload,
            timestamp: now,
        });
    }

    pub fn session_created(&self, now: DateTime<Utc>) {
        self.record(EventKind::SessionCreated, json!({}), now);
    }

    pub fn message_sent(&self, message_length: usize, conversation_length: usize, now: DateTime<Utc>) {
        self.record(
            EventKind::MessageSent,
            json!({
                "message_length": message_length,
                "conversation_length": conversation_length,
            }),
            now,
        );
    }

    pub fn message_received(
        &self,
        message_length: usize,
        conversation_length: usize,
        now: DateTime<Utc>,
    ) {
        self.record(
            EventKind::MessageReceived,
            json!({
                "message_length": message_length,
                "conversation_length": conversation_length,
            }),
            now,
        );
    }

    pub fn message_error(&self, error: &str, now: DateTime<Utc>) {
        self.record(EventKind::MessageError, json!({ "error": error }), now);
    }
}
