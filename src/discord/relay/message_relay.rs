// Discord side of the relay.
//
// **The pattern:**
// 1. Pull the primitive fields out of the serenity `Message`
// 2. Let the core `RelayService` filter and produce a reply
// 3. Post that reply back where the message came from
//
// No relay decisions are made here.

use crate::core::relay::{split_for_discord, IncomingMessage, RelayReply};
use crate::discord::Data;
use poise::serenity_prelude as serenity;
use std::collections::HashMap;

/// Handles a single message-create event.
pub async fn handle_message(
    ctx: &serenity::Context,
    new_message: &serenity::Message,
    data: &Data,
) {
    let incoming = to_incoming(ctx, new_message, data.relay.monitored_channel_id()).await;
    if !data.relay.should_relay(&incoming) {
        return;
    }

    tracing::info!(
        message_id = new_message.id.get(),
        channel_id = incoming.channel_id,
        thread_parent_id = ?incoming.thread_parent_id,
        author = %new_message.author.name,
        "Relaying message to completion API"
    );

    // Best-effort, a missing typing indicator is not worth failing over.
    let _ = new_message.channel_id.broadcast_typing(&ctx.http).await;

    let reply = data.relay.reply_for(&incoming.content).await;
    if reply == RelayReply::Fallback {
        tracing::warn!(message_id = new_message.id.get(), "Sending fallback reply");
    }

    send_reply(ctx, new_message, &reply).await;
}

/// Builds the relay's view of a Discord message.
///
/// The thread parent is only looked up when it could matter: a non-bot message
/// outside the monitored channel itself.
async fn to_incoming(
    ctx: &serenity::Context,
    message: &serenity::Message,
    monitored_channel_id: u64,
) -> IncomingMessage {
    let channel_id = message.channel_id.get();
    let author_is_bot = message.author.bot;

    let thread_parent_id = if author_is_bot || channel_id == monitored_channel_id {
        None
    } else {
        thread_parent_id(ctx, message).await
    };

    IncomingMessage {
        author_is_bot,
        channel_id,
        thread_parent_id,
        content: message.content.clone(),
    }
}

/// Resolves the parent of the channel a message was posted in.
///
/// DMs never have one. The guild cache is checked first so that messages in
/// known channels and threads don't cost a REST call.
async fn thread_parent_id(ctx: &serenity::Context, message: &serenity::Message) -> Option<u64> {
    let guild_id = message.guild_id?;
    let channel_id = message.channel_id;

    let cached = ctx
        .cache
        .guild(guild_id)
        .and_then(|guild| cached_parent(&guild.threads, &guild.channels, channel_id));
    if let Some(parent) = cached {
        return parent;
    }

    match channel_id.to_channel(ctx).await {
        Ok(channel) => parent_of(&channel),
        Err(e) => {
            tracing::debug!(channel_id = channel_id.get(), "Could not resolve channel: {}", e);
            None
        }
    }
}

/// Parent lookup against a guild's cached threads and channels.
///
/// `None` means the channel isn't cached; `Some(None)` means it is cached and
/// has no thread parent.
fn cached_parent(
    threads: &[serenity::GuildChannel],
    channels: &HashMap<serenity::ChannelId, serenity::GuildChannel>,
    channel_id: serenity::ChannelId,
) -> Option<Option<u64>> {
    threads
        .iter()
        .find(|thread| thread.id == channel_id)
        .or_else(|| channels.get(&channel_id))
        .map(thread_parent)
}

/// Parent of a thread. Anything that isn't a thread yields `None`, so a
/// text channel's category never counts.
fn parent_of(channel: &serenity::Channel) -> Option<u64> {
    match channel {
        serenity::Channel::Guild(channel) => thread_parent(channel),
        _ => None,
    }
}

fn thread_parent(channel: &serenity::GuildChannel) -> Option<u64> {
    if channel.thread_metadata.is_none() {
        return None;
    }
    channel.parent_id.map(|id| id.get())
}

/// Posts the reply, splitting it to respect Discord's message length limit.
async fn send_reply(ctx: &serenity::Context, message: &serenity::Message, reply: &RelayReply) {
    let mut chunks = split_for_discord(reply.text()).into_iter();

    if let Some(first) = chunks.next() {
        if let Err(e) = message.reply(&ctx.http, first).await {
            tracing::error!(message_id = message.id.get(), "Failed to send reply: {}", e);
            return;
        }
    }

    for chunk in chunks {
        if let Err(e) = message.channel_id.say(&ctx.http, chunk).await {
            tracing::error!(message_id = message.id.get(), "Failed to send reply chunk: {}", e);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MONITORED: u64 = 1_000;
    const CATEGORY: u64 = 900;

    fn guild_channel(id: u64, kind: u8, parent_id: u64, thread: bool) -> serenity::GuildChannel {
        let mut value = json!({
            "id": id.to_string(),
            "type": kind,
            "guild_id": "77",
            "name": "help",
            "position": 0,
            "permission_overwrites": [],
            "nsfw": false,
            "flags": 0,
            "parent_id": parent_id.to_string(),
        });
        if thread {
            value["thread_metadata"] = json!({
                "archived": false,
                "auto_archive_duration": 1440,
                "archive_timestamp": "2024-01-01T00:00:00.000000+00:00",
                "locked": false,
            });
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_thread_resolves_to_parent() {
        // type 11 = public thread
        let thread = serenity::Channel::Guild(guild_channel(4242, 11, MONITORED, true));
        assert_eq!(parent_of(&thread), Some(MONITORED));
    }

    #[test]
    fn test_category_of_text_channel_is_ignored() {
        let text = serenity::Channel::Guild(guild_channel(4242, 0, CATEGORY, false));
        assert_eq!(parent_of(&text), None);

        // Even if the category happens to be the monitored id.
        let text_under_monitored =
            serenity::Channel::Guild(guild_channel(4242, 0, MONITORED, false));
        assert_eq!(parent_of(&text_under_monitored), None);
    }

    #[test]
    fn test_private_channel_has_no_parent() {
        let dm: serenity::Channel = serde_json::from_value(json!({
            "id": "5151",
            "type": 1,
            "recipients": [{
                "id": "31",
                "username": "someone",
                "discriminator": "0",
                "avatar": null,
            }],
        }))
        .unwrap();

        assert!(matches!(dm, serenity::Channel::Private(_)));
        assert_eq!(parent_of(&dm), None);
    }

    #[test]
    fn test_cached_thread_and_channel_lookup() {
        let thread = guild_channel(50, 11, MONITORED, true);
        let text = guild_channel(60, 0, CATEGORY, false);
        let threads = vec![thread];
        let channels = HashMap::from([(serenity::ChannelId::new(60), text)]);

        assert_eq!(
            cached_parent(&threads, &channels, serenity::ChannelId::new(50)),
            Some(Some(MONITORED))
        );
        assert_eq!(
            cached_parent(&threads, &channels, serenity::ChannelId::new(60)),
            Some(None)
        );
        // Unknown channels fall through to the REST lookup.
        assert_eq!(
            cached_parent(&threads, &channels, serenity::ChannelId::new(70)),
            None
        );
    }
}
