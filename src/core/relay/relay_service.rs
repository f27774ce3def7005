// Relay service - decides whether a message is relayed and what gets posted back.
//
// NO Discord dependencies here. The Discord layer hands us an
// `IncomingMessage` and posts whatever `RelayReply` we return.

use super::models::{CompletionRequest, CompletionResponse, IncomingMessage, RelayReply};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Posted whenever the completion call fails for any reason.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't get a response from the AI right now. Please try again later.";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Could not reach completion API: {0}")]
    Network(String),

    #[error("Completion API did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Completion API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected completion response: {0}")]
    MalformedResponse(String),
}

// ============================================================================
// PROVIDER TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one completion request and returns the first choice's text.
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct RelayService<P: CompletionProvider> {
    provider: P,
    model_name: String,
    monitored_channel_id: u64,
}

impl<P: CompletionProvider> RelayService<P> {
    pub fn new(provider: P, model_name: String, monitored_channel_id: u64) -> Self {
        Self {
            provider,
            model_name,
            monitored_channel_id,
        }
    }

    pub fn monitored_channel_id(&self) -> u64 {
        self.monitored_channel_id
    }

    /// True when the message sits in the monitored channel or in one of its threads.
    pub fn is_monitored(&self, message: &IncomingMessage) -> bool {
        message.channel_id == self.monitored_channel_id
            || message.thread_parent_id == Some(self.monitored_channel_id)
    }

    /// Bot-authored and out-of-scope messages are dropped without a reply.
    pub fn should_relay(&self, message: &IncomingMessage) -> bool {
        !message.author_is_bot && self.is_monitored(message)
    }

    /// Asks the provider for a reply to `text`.
    ///
    /// Never fails: every provider error is logged and turned into
    /// [`RelayReply::Fallback`].
    pub async fn reply_for(&self, text: &str) -> RelayReply {
        let request = CompletionRequest::single_turn(&self.model_name, text);

        match self.provider.complete(&request).await {
            Ok(response) => RelayReply::Generated(response.reply_text),
            Err(err) => {
                match &err {
                    CompletionError::Network(cause) => {
                        tracing::error!(cause = %cause, "Completion request failed to connect")
                    }
                    CompletionError::Timeout(limit) => {
                        tracing::warn!(timeout = ?limit, "Completion request timed out")
                    }
                    CompletionError::Status { status, body } => {
                        tracing::error!(status = *status, body = %body, "Completion API returned an error status")
                    }
                    CompletionError::MalformedResponse(detail) => {
                        tracing::error!(detail = %detail, "Completion API response had an unexpected shape")
                    }
                }
                RelayReply::Fallback
            }
        }
    }
}

impl RelayReply {
    /// The text that ends up in the channel.
    pub fn text(&self) -> &str {
        match self {
            RelayReply::Generated(text) => text,
            RelayReply::Fallback => FALLBACK_REPLY,
        }
    }
}
