// Discord layer - event handlers and presence.

#[path = "relay/message_relay.rs"]
pub mod relay;

pub mod presence;

use crate::core::relay::RelayService;
use crate::infra::completion::OpenWebClient;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Shared state handed to every event by poise.
pub struct Data {
    pub relay: Arc<RelayService<OpenWebClient>>,
}
