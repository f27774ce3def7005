pub mod formatting;
pub mod models;
pub mod relay_service;

pub use formatting::split_for_discord;
pub use models::{CompletionRequest, CompletionResponse, IncomingMessage, RelayReply};
pub use relay_service::{CompletionError, CompletionProvider, RelayService};
