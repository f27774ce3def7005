// OpenWeb completion client - `CompletionProvider` backed by an
// OpenAI-compatible `/chat/completions` endpoint.
//
// The request is a plain bearer-authenticated JSON POST. The answer lives at
// `choices[0].message.content`; anything else is a malformed response.

use crate::core::relay::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Upper bound on a whole completion round trip.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Error bodies are cut to this many characters before being logged.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct OpenWebClient {
    client: Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl OpenWebClient {
    pub fn new(api_url: String, api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_timeout(api_url, api_key, COMPLETION_TIMEOUT)
    }

    pub fn with_timeout(
        api_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url,
            api_key,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout(self.timeout)
        } else {
            CompletionError::Network(err.to_string())
        }
    }

    fn parse_body(body: &str) -> Result<CompletionResponse, CompletionError> {
        let parsed: ChatCompletionBody = serde_json::from_str(body)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedResponse("empty choices array".to_string()))?;

        Ok(CompletionResponse {
            reply_text: first.message.content,
        })
    }
}

/// Keeps proxy error pages from flooding the logs.
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[async_trait]
impl CompletionProvider for OpenWebClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        tracing::debug!(model = %request.model, url = %self.api_url, "Sending completion request");

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Self::parse_body(&body)
    }
}
