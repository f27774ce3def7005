// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "config/bot_config.rs"]
pub mod config;

#[path = "relay/mod.rs"]
pub mod relay;
