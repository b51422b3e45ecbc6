// common/src/messages.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outbound request for a guest/marketing chat send.
///
/// `session_id` is always the current guest session's id; the backend treats
/// a missing or mismatched id as a new anonymous quota bucket, so the client
/// must never send a stale id after invalidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
    pub session_id: Uuid,
}

/// Outbound request for an authenticated/business chat send.
///
/// Carries no session identifier; business-tier throttling, if any, is the
/// backend's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Response shape shared by both chat endpoints.
///
/// Both fields default so a malformed or empty body decodes to an empty
/// assistant message instead of failing the exchange.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}
