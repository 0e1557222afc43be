use std::sync::Arc;

use {
    async_trait::async_trait,
    serenity::{
        all::{Channel, ChannelId, ChannelType, Message},
        http::Http,
    },
    tracing::debug,
};

use klintar_channels::{ChannelHistory, ChannelMessage, Error, Result};

/// Milliseconds between the Unix epoch and the Discord epoch (2015-01-01).
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Reads channel history through Discord's REST API.
#[derive(Clone)]
pub struct DiscordHistory {
    http: Arc<Http>,
}

impl DiscordHistory {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChannelHistory for DiscordHistory {
    async fn fetch_recent_messages(
        &self,
        channel_id: &str,
        limit: u8,
    ) -> Result<Vec<ChannelMessage>> {
        let Some(id) = parse_channel_id(channel_id) else {
            return Err(Error::channel_not_found(channel_id));
        };

        let channel = self
            .http
            .get_channel(id)
            .await
            .map_err(|e| classify(channel_id, "resolve channel", e))?;

        if let Some(kind) = non_text_kind(&channel) {
            return Err(Error::not_textual(channel_id, kind));
        }

        let messages = self
            .http
            .get_messages(id, None, Some(limit))
            .await
            .map_err(|e| classify(channel_id, "fetch messages", e))?;

        debug!(channel_id, count = messages.len(), "fetched discord messages");
        Ok(messages.iter().map(to_channel_message).collect())
    }
}

/// Discord ids are non-zero u64 snowflakes.
fn parse_channel_id(raw: &str) -> Option<ChannelId> {
    raw.parse::<u64>().ok().filter(|&id| id != 0).map(ChannelId::new)
}

/// Name of the channel's kind when it cannot hold message history.
fn non_text_kind(channel: &Channel) -> Option<String> {
    match channel {
        Channel::Guild(gc) if !is_text_capable(gc.kind) => Some(format!("{:?}", gc.kind)),
        Channel::Guild(_) | Channel::Private(_) => None,
        _ => Some("unsupported".into()),
    }
}

/// Channel kinds whose message history can be listed.
///
/// Voice and stage channels carry a text chat, so they count as textual;
/// categories and forums do not.
fn is_text_capable(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::Private
            | ChannelType::News
            | ChannelType::NewsThread
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
            | ChannelType::Voice
            | ChannelType::Stage
    )
}

/// A 404 from Discord means the channel does not exist or is invisible to
/// the bot; every other failure is surfaced as an upstream error.
fn classify(channel_id: &str, context: &str, err: serenity::Error) -> Error {
    let not_found = matches!(
        &err,
        serenity::Error::Http(http_err)
            if http_err.status_code().map(|s| s.as_u16()) == Some(404)
    );
    if not_found {
        Error::channel_not_found(channel_id)
    } else {
        Error::external(context, err)
    }
}

fn to_channel_message(msg: &Message) -> ChannelMessage {
    ChannelMessage::new(
        msg.id.to_string(),
        Some(msg.author.name.as_str()),
        msg.content.clone(),
        snowflake_millis(msg.id.get()),
    )
}

/// Creation time encoded in a snowflake, in milliseconds since the Unix epoch.
fn snowflake_millis(snowflake: u64) -> i64 {
    i64::try_from((snowflake >> 22) + DISCORD_EPOCH_MS).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("1234567890123", Some(1_234_567_890_123))]
    #[case("0", None)]
    #[case("general", None)]
    #[case("-5", None)]
    #[case("", None)]
    #[case("99999999999999999999999", None)]
    fn channel_id_parsing(#[case] raw: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_channel_id(raw).map(|id| id.get()), expected);
    }

    #[test]
    fn snowflake_timestamp() {
        // Example from Discord's API reference: 2016-04-30 11:18:25.796 UTC.
        assert_eq!(snowflake_millis(175_928_847_299_117_063), 1_462_015_105_796);
        assert_eq!(snowflake_millis(0), 1_420_070_400_000);
    }

    #[test]
    fn later_snowflakes_sort_later() {
        let earlier = snowflake_millis(175_928_847_299_117_063);
        let later = snowflake_millis(175_928_847_299_117_063 + (1 << 22));
        assert_eq!(later - earlier, 1);
    }

    #[rstest]
    #[case(ChannelType::Text, true)]
    #[case(ChannelType::News, true)]
    #[case(ChannelType::PublicThread, true)]
    #[case(ChannelType::PrivateThread, true)]
    #[case(ChannelType::Voice, true)]
    #[case(ChannelType::Category, false)]
    #[case(ChannelType::Forum, false)]
    fn text_capability(#[case] kind: ChannelType, #[case] textual: bool) {
        assert_eq!(is_text_capable(kind), textual);
    }
}
