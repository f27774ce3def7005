//! Formatting helpers for posting completion text to Discord.

/// Discord rejects messages longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Stand-in for a completion that came back empty, since Discord refuses empty messages.
pub const EMPTY_REPLY: &str = "(empty response)";

/// Splits reply text into chunks Discord will accept.
///
/// Chunks break on char boundaries, never inside a multi-byte character.
/// Always returns at least one chunk.
pub fn split_for_discord(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![EMPTY_REPLY.to_string()];
    }

    text.chars()
        .collect::<Vec<char>>()
        .chunks(DISCORD_MESSAGE_LIMIT)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(split_for_discord("Hello!"), vec!["Hello!".to_string()]);
    }

    #[test]
    fn test_empty_text_gets_placeholder() {
        assert_eq!(split_for_discord(""), vec![EMPTY_REPLY.to_string()]);
        assert_eq!(split_for_discord(" \n "), vec![EMPTY_REPLY.to_string()]);
    }

    #[test]
    fn test_long_text_is_split_at_limit() {
        let text = "a".repeat(DISCORD_MESSAGE_LIMIT * 2 + 10);
        let chunks = split_for_discord(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), DISCORD_MESSAGE_LIMIT);
        assert_eq!(chunks[1].chars().count(), DISCORD_MESSAGE_LIMIT);
        assert_eq!(chunks[2].chars().count(), 10);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_multibyte_characters_stay_whole() {
        let text = "é".repeat(DISCORD_MESSAGE_LIMIT + 1);
        let chunks = split_for_discord(&text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], "é");
    }
}
