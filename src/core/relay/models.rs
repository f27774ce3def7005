use serde::Serialize;

/// The slice of a Discord message the relay cares about.
///
/// Built by the Discord layer for every message-create event and dropped
/// once the reply has been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub author_is_bot: bool,
    pub channel_id: u64,
    /// Parent channel, only set when the message was posted inside a thread.
    pub thread_parent_id: Option<u64>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of a chat completion request. Always single-turn.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    pub fn single_turn(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::user(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    pub reply_text: String,
}

/// What the relay decided to post back for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayReply {
    Generated(String),
    Fallback,
}
