// This is the entry point of the relay bot.
//
// **Architecture Overview:**
// - `core/` = Relay logic and configuration (platform-agnostic)
// - `infra/` = Implementations of core traits (the completion HTTP client)
// - `discord/` = Discord-specific adapters (event handling, presence)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register the event handler

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::config::BotConfig;
use crate::core::relay::RelayService;
use crate::discord::{presence, Data, Error};
use crate::infra::completion::OpenWebClient;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        discord::relay::handle_message(ctx, new_message, data).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists), before RUST_LOG is read
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env().context("Invalid bot configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        model = %config.model_name,
        monitored_channel_id = config.monitored_channel_id,
        "Configuration loaded"
    );

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let completion_client = OpenWebClient::new(config.api_url.clone(), config.api_key.clone())
        .context("Failed to build completion HTTP client")?;
    let relay_service = Arc::new(RelayService::new(
        completion_client,
        config.model_name.clone(),
        config.monitored_channel_id,
    ));

    let data = Data {
        relay: Arc::clone(&relay_service),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Connected to Discord");
                presence::on_ready(ctx);
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await
        .context("Error creating Discord client")?;

    // Ctrl-C stops every shard, which lets `start` return cleanly.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.context("Discord client stopped with an error")?;

    tracing::info!("Bot stopped");
    Ok(())
}
