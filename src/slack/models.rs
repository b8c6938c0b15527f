//! Domain models for channel scans and their Slack API counterparts.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into the public domain types.

use serde::Deserialize;

/// Channel identity with a display name.
///
/// Constructed once per run; the name falls back to the raw channel id when
/// the metadata lookup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Slack channel id (e.g. `C0123456789`).
    pub id: String,
    /// Channel display name, or the id when the lookup failed.
    pub name: String,
}

/// One message fetched from channel history.
///
/// Ephemeral: fetched per run and dropped afterwards. The `ts` value is
/// Slack's opaque message timestamp, which doubles as the message id for
/// reaction writes and permalinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    /// Slack message timestamp (e.g. `1700000000.123456`).
    pub ts: String,
    /// Message text as Slack renders it, including `<url|label>` wrapping.
    pub text: String,
    /// Names of emoji reactions already present on the message.
    pub reactions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiChannel {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReaction {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiMessage {
    pub(crate) ts: String,
    #[serde(default)]
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) reactions: Vec<ApiReaction>,
}

impl From<ApiMessage> for RawMessage {
    fn from(message: ApiMessage) -> Self {
        Self {
            ts: message.ts,
            text: message.text,
            reactions: message
                .reactions
                .into_iter()
                .map(|reaction| reaction.name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChannelPayload {
    #[serde(default)]
    pub(crate) channel: Option<ApiChannel>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryPayload {
    #[serde(default)]
    pub(crate) messages: Vec<ApiMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Ack {}
