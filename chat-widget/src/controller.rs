// chat-widget/src/controller.rs
use crate::analytics::AnalyticsRecorder;
use crate::clock::Clock;
use crate::context::{resolve, AuthState, ChatContext};
use crate::rate_limiter::{evaluate, RateLimitDecision};
use crate::session_store::GuestSessionStore;
use crate::transport::ChatTransport;
use common::config::ChatConfig;
use common::messages::{AuthenticatedChatRequest, GuestChatRequest};
use common::models::message::{ConversationMessage, Role};
use common::models::session::GuestSession;
use std::sync::Arc;

/// Interaction state of the chat widget.
///
/// `Closed` and `Idle` are the only states reachable from a cold start.
/// `Error` and `RateLimited` return to `Idle` once the user edits the input
/// or the limiting condition clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Closed,
    Idle,
    Sending,
    Error,
    RateLimited,
}

/// Result of a submit attempt. Rejections are observable no-ops, not errors:
/// the corresponding UI affordance is disabled rather than toasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Message dispatched and a reply appended
    Delivered,
    /// Message dispatched but the transport failed; fallback copy appended
    Failed,
    /// Blank input, nothing happened
    RejectedEmpty,
    /// Guest quota exhausted, no transport call made
    RejectedRateLimited,
    /// A send is already in flight
    RejectedBusy,
    /// Widget is closed
    RejectedClosed,
}

/// Widget state machine: orchestrates input, context resolution, rate
/// limiting, transport dispatch, and analytics for one chat conversation.
///
/// All dependencies are injected so the machine can be unit-tested without a
/// rendering harness or a live backend.
pub struct ChatController {
    config: ChatConfig,
    auth: AuthState,
    clock: Arc<dyn Clock>,
    transport: Arc<dyn ChatTransport>,
    sessions: GuestSessionStore,
    analytics: AnalyticsRecorder,
    state: WidgetState,
    context: Option<ChatContext>,
    conversation: Vec<ConversationMessage>,
    conversation_id: Option<String>,
    session: Option<GuestSession>,
    decision: Option<RateLimitDecision>,
}

impl ChatController {
    pub fn new(
        config: ChatConfig,
        auth: AuthState,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn ChatTransport>,
        sessions: GuestSessionStore,
        analytics: AnalyticsRecorder,
    ) -> Self {
        Self {
            config,
            auth,
            clock,
            transport,
            sessions,
            analytics,
            state: WidgetState::Closed,
            context: None,
            conversation: Vec::new(),
            conversation_id: None,
            session: None,
            decision: None,
        }
    }

    /// Open the widget: resolve the identity context, and under the guest
    /// context fetch or create the session and compute the initial quota
    /// decision.
    pub fn open(&mut self) {
        let context = resolve(&self.auth);
        self.apply_context(context);

        if context.is_guest() {
            self.refresh_quota();
            let denied = self
                .decision
                .as_ref()
                .map(|d| !d.allowed)
                .unwrap_or(false);
            self.state = if denied {
                WidgetState::RateLimited
            } else {
                WidgetState::Idle
            };
        } else {
            self.state = WidgetState::Idle;
        }

        tracing::debug!("Widget opened in {:?} context", context);
    }

    /// Close the widget. Conversation state is retained in memory so a
    /// reopen within the same tab resumes the thread, unless a context
    /// switch occurs in between.
    pub fn close(&mut self) {
        self.state = WidgetState::Closed;
    }

    /// Report a change in authentication state. For an open widget the
    /// context switch is applied immediately; for a closed one it is picked
    /// up at the next `open`.
    pub fn set_auth_state(&mut self, auth: AuthState) {
        self.auth = auth;
        if self.state != WidgetState::Closed {
            self.open();
        }
    }

    /// The user edited the input; clears a sticky error, and clears the
    /// rate-limited state if the quota condition no longer holds.
    pub fn input_edited(&mut self) {
        match self.state {
            WidgetState::Error => self.state = WidgetState::Idle,
            WidgetState::RateLimited => {
                self.refresh_quota();
                if self.decision.as_ref().map(|d| d.allowed).unwrap_or(false) {
                    self.state = WidgetState::Idle;
                }
            }
            _ => {}
        }
    }

    /// Attempt to send a message. Guarded on non-blank input, no send in
    /// flight, and (guest) remaining quota; a failed guard is a no-op.
    ///
    /// Quota is consumed only after the transport resolves successfully, so
    /// a rejected attempt or a failed dispatch never costs a message.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        match self.state {
            WidgetState::Closed => return SubmitOutcome::RejectedClosed,
            WidgetState::Sending => {
                tracing::warn!("Submit refused: a send is already in flight");
                return SubmitOutcome::RejectedBusy;
            }
            _ => {}
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::RejectedEmpty;
        }

        // The visitor may have logged in or out since the last interaction
        let context = resolve(&self.auth);
        self.apply_context(context);

        if context.is_guest() {
            // Renew an idle-expired session before consulting quota, so the
            // guard never admits on a stale decision and an expired session
            // id never goes on the wire
            self.refresh_quota();
            let allowed = self.decision.as_ref().map(|d| d.allowed).unwrap_or(false);
            if !allowed {
                self.state = WidgetState::RateLimited;
                return SubmitOutcome::RejectedRateLimited;
            }
        }

        self.state = WidgetState::Sending;

        let now = self.clock.now();
        self.conversation
            .push(ConversationMessage::new(Role::User, trimmed, now));
        self.analytics
            .message_sent(trimmed.chars().count(), self.conversation.len(), now);

        let result = match context {
            ChatContext::Guest => {
                // The guard above guarantees a session here
                let session_id = self.session.as_ref().map(|s| s.id).unwrap_or_default();
                self.transport
                    .send_guest(GuestChatRequest {
                        message: trimmed.to_string(),
                        conversation_id: self.conversation_id.clone(),
                        session_id,
                    })
                    .await
            }
            ChatContext::Authenticated => {
                self.transport
                    .send_authenticated(AuthenticatedChatRequest {
                        message: trimmed.to_string(),
                        conversation_id: self.conversation_id.clone(),
                    })
                    .await
            }
        };

        match result {
            Ok(reply) => {
                if reply.conversation_id.is_some() {
                    self.conversation_id = reply.conversation_id.clone();
                }

                let now = self.clock.now();
                self.conversation
                    .push(ConversationMessage::new(Role::Assistant, reply.response.clone(), now));

                // Quota accounting lands before the state transition, so an
                // observer never sees the reply without the incremented
                // counter or vice versa
                if context.is_guest() {
                    if let Some(session) = self.session.as_mut() {
                        self.sessions.record_message(session);
                        self.decision =
                            Some(evaluate(session, self.clock.now(), &self.config));
                    }
                }

                self.analytics.message_received(
                    reply.response.chars().count(),
                    self.conversation.len(),
                    now,
                );

                let denied = context.is_guest()
                    && self
                        .decision
                        .as_ref()
                        .map(|d| !d.allowed)
                        .unwrap_or(false);
                self.state = if denied {
                    WidgetState::RateLimited
                } else {
                    WidgetState::Idle
                };

                SubmitOutcome::Delivered
            }
            Err(e) => {
                tracing::warn!("Chat transport failed: {}", e);

                let now = self.clock.now();
                self.conversation.push(ConversationMessage::new(
                    Role::Assistant,
                    context.failure_fallback(),
                    now,
                ));
                self.analytics.message_error(&e.to_string(), now);
                self.state = WidgetState::Error;

                SubmitOutcome::Failed
            }
        }
    }

    /// Whether the persistent "sign up for unlimited messages" affordance
    /// shows: guest context with quota low but not exhausted.
    pub fn show_signup_nudge(&self) -> bool {
        if !self.context.map(|c| c.is_guest()).unwrap_or(false) {
            return false;
        }
        match self.decision.as_ref() {
            Some(d) => d.remaining > 0 && d.remaining <= self.config.low_quota_threshold,
            None => false,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn context(&self) -> Option<ChatContext> {
        self.context
    }

    pub fn conversation(&self) -> &[ConversationMessage] {
        &self.conversation
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Remaining guest quota; `None` under the authenticated context, where
    /// no decision is computed at all.
    pub fn remaining(&self) -> Option<u32> {
        self.decision.as_ref().map(|d| d.remaining)
    }

    pub fn rate_limit_decision(&self) -> Option<&RateLimitDecision> {
        self.decision.as_ref()
    }

    /// Input placeholder copy for the active context.
    pub fn placeholder(&self) -> &'static str {
        self.context.unwrap_or(ChatContext::Guest).placeholder()
    }

    /// Welcome copy for the active context.
    pub fn welcome(&self) -> &'static str {
        self.context.unwrap_or(ChatContext::Guest).welcome()
    }

    /// Apply a context change: a switch discards the conversation thread and
    /// cached conversation id, and a guest-to-authenticated transition also
    /// invalidates the guest session so a stale session id is never sent.
    fn apply_context(&mut self, context: ChatContext) {
        if self.context == Some(context) {
            return;
        }

        if self.context.is_some() {
            tracing::info!("Context switch to {:?}, discarding conversation", context);
            self.conversation.clear();
            self.conversation_id = None;

            if !context.is_guest() {
                self.sessions.invalidate();
            }
            self.session = None;
            self.decision = None;
        }

        self.context = Some(context);
        self.analytics.set_context(context);
    }

    /// Ensure a live session and a fresh decision under the guest context;
    /// an expired session is replaced transparently, which is the intended
    /// quota-reset mechanism.
    fn refresh_quota(&mut self) {
        let stale = match self.session.as_ref() {
            Some(session) => !self.sessions.is_active(session),
            None => true,
        };

        if stale {
            let (session, created) = self.sessions.get_or_create();
            if created {
                self.analytics.session_created(self.clock.now());
            }
            self.session = Some(session);
        } else if let Some(session) = self.session.as_mut() {
            self.sessions.touch_activity(session);
        }

        if let Some(session) = self.session.as_ref() {
            self.decision = Some(evaluate(session, self.clock.now(), &self.config));
        }
    }
}
