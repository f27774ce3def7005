// Bot presence - Discord-only glue, nothing here touches the core.

use poise::serenity_prelude as serenity;

/// Sets the status shown under the bot's name once the gateway is ready.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::listening("your questions");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
