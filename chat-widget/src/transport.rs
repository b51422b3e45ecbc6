// chat-widget/src/transport.rs
use async_trait::async_trait;
use common::messages::{AuthenticatedChatRequest, ChatResponse, GuestChatRequest};
use thiserror::Error;

/// Failure modes of an AI transport call. All of them are recovered at the
/// controller boundary and surfaced as a fallback message, never propagated
/// to the host page.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat endpoint returned status {0}")]
    Status(reqwest::StatusCode),
}

/// The external AI collaborator. How answers are generated is out of scope;
/// this seam exists so the controller can be driven by a scripted fake in
/// tests.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_guest(&self, request: GuestChatRequest) -> Result<ChatResponse, TransportError>;

    async fn send_authenticated(
        &self,
        request: AuthenticatedChatRequest,
    ) -> Result<ChatResponse, TransportError>;
}

/// HTTP transport posting JSON to the configured guest and authenticated
/// endpoints.
pub struct HttpChatTransport {
    client: reqwest::Client,
    guest_endpoint: String,
    authenticated_endpoint: String,
}

impl HttpChatTransport {
    pub fn new(guest_endpoint: impl Into<String>, authenticated_endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            guest_endpoint: guest_endpoint.into(),
            authenticated_endpoint: authenticated_endpoint.into(),
        }
    }

    pub fn from_config(config: &common::config::ChatConfig) -> Self {
        Self::new(
            config.guest_endpoint.clone(),
            config.authenticated_endpoint.clone(),
        )
    }

    async fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<ChatResponse, TransportError> {
        let response = self.client.post(endpoint).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Chat endpoint {} returned {}", endpoint, status);
            return Err(TransportError::Status(status));
        }

        // A malformed or empty body becomes an empty assistant message
        // rather than a failed exchange
        let raw = response.text().await?;
        let parsed = serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::debug!("Malformed chat response body, treating as empty: {}", e);
            ChatResponse::default()
        });

        Ok(parsed)
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send_guest(&self, request: GuestChatRequest) -> Result<ChatResponse, TransportError> {
        tracing::debug!("Dispatching guest chat message for session {}", request.session_id);
        self.post_json(&self.guest_endpoint, &request).await
    }

    async fn send_authenticated(
        &self,
        request: AuthenticatedChatRequest,
    ) -> Result<ChatResponse, TransportError> {
        tracing::debug!("Dispatching authenticated chat message");
        self.post_json(&self.authenticated_endpoint, &request).await
    }
}
