// chat-widget/src/context.rs
use serde::{Deserialize, Serialize};

/// Authentication state as reported by the host application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_initialized: bool,
}

/// Identity context governing a conversation. Exactly one context is active
/// per conversation; a switch mid-conversation discards conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatContext {
    /// Unauthenticated visitor: rate-limited, analytics-tracked, marketing
    /// framing
    Guest,
    /// Logged-in user: unthrottled by this subsystem, no analytics,
    /// operational-data framing
    Authenticated,
}

impl ChatContext {
    pub fn is_guest(&self) -> bool {
        matches!(self, ChatContext::Guest)
    }

    /// Input placeholder copy for this context.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ChatContext::Guest => "Ask about features, pricing, or getting started\u{2026}",
            ChatContext::Authenticated => {
                "Ask about sales, inventory, pricing, or customers\u{2026}"
            }
        }
    }

    /// Greeting shown when the widget opens with an empty conversation.
    pub fn welcome(&self) -> &'static str {
        match self {
            ChatContext::Guest => {
                "Hi! I can answer questions about the product, plans, and pricing. \
                 What would you like to know?"
            }
            ChatContext::Authenticated => {
                "Hi! Ask me anything about your business data and I'll dig in."
            }
        }
    }

    /// Assistant-style copy shown in place of a reply when the transport
    /// fails. Guests get a human contact channel since they cannot reach
    /// support tooling inside the product yet.
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            ChatContext::Guest => {
                "Sorry, something went wrong on our side. You can reach a human at \
                 support@example.com, or sign up for the free tier to get in-app help."
            }
            ChatContext::Authenticated => {
                "Sorry, something went wrong answering that. Please try again in a moment."
            }
        }
    }
}

/// Decide which identity context governs the current interaction.
///
/// Guests never require an initialization step: an unauthenticated visitor
/// gets the guest context even while the auth system is still starting up,
/// so guest capability never blocks on a readiness flag guests cannot
/// satisfy.
pub fn resolve(auth: &AuthState) -> ChatContext {
    if auth.is_authenticated {
        ChatContext::Authenticated
    } else {
        ChatContext::Guest
    }
}
