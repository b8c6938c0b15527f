//! Digest composition for channels and DM recipients.
//!
//! Composers are pure: they render text from accumulated summaries and a
//! supplied "now", mutate nothing, and keep pull requests in first-seen
//! order within each channel scan.

use chrono::{DateTime, Local};

use crate::github::PrInfo;
use crate::slack::ChannelInfo;

use super::timefmt::{format_relative, parse_slack_timestamp};

/// Header line marker shared by every digest.
///
/// Also used to recognise a digest the bot posted earlier: a recent message
/// containing this marker suppresses re-posting, and messages carrying it
/// are skipped during scans so the bot never triages its own digests.
pub const DIGEST_HEADER: &str = "PR review round-up";

/// Accumulated pull request findings for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    /// The channel these findings came from.
    pub channel: ChannelInfo,
    /// Findings in first-seen order.
    pub entries: Vec<SummaryEntry>,
}

/// One resolved reference together with its originating message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Resolved pull request facts.
    pub info: PrInfo,
    /// Slack timestamp of the message the reference appeared in.
    pub message_ts: String,
}

/// Renders the digest for one channel, or `None` when it saw no pull
/// requests.
#[must_use]
pub fn compose_channel_digest(
    summary: &ChannelSummary,
    subdomain: &str,
    now: DateTime<Local>,
) -> Option<String> {
    if summary.entries.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(summary.entries.len() + 1);
    lines.push(format!(
        ":clipboard: *{DIGEST_HEADER}* for #{}",
        summary.channel.name
    ));
    lines.extend(
        summary
            .entries
            .iter()
            .map(|entry| digest_line(entry, &summary.channel.id, subdomain, now)),
    );
    Some(lines.join("\n"))
}

/// Renders the cross-channel digest sent to DM recipients, or `None` when
/// no channel saw any pull requests.
#[must_use]
pub fn compose_recipient_digest(
    summaries: &[ChannelSummary],
    subdomain: &str,
    now: DateTime<Local>,
) -> Option<String> {
    let active: Vec<&ChannelSummary> = summaries
        .iter()
        .filter(|summary| !summary.entries.is_empty())
        .collect();
    if active.is_empty() {
        return None;
    }

    let mut lines = vec![format!(
        ":clipboard: *{DIGEST_HEADER}* across {} channel(s)",
        active.len()
    )];
    for summary in active {
        lines.push(format!("*#{}*", summary.channel.name));
        lines.extend(
            summary
                .entries
                .iter()
                .map(|entry| digest_line(entry, &summary.channel.id, subdomain, now)),
        );
    }
    Some(lines.join("\n"))
}

fn digest_line(
    entry: &SummaryEntry,
    channel_id: &str,
    subdomain: &str,
    now: DateTime<Local>,
) -> String {
    let info = &entry.info;
    let when = parse_slack_timestamp(&entry.message_ts)
        .map_or_else(|| "recently".to_owned(), |moment| format_relative(moment, now));
    let permalink = message_permalink(subdomain, channel_id, &entry.message_ts);
    format!(
        "• <{}|{}> by {} ({}) · <{permalink}|{when}>",
        info.locator.canonical_url(),
        info.title,
        info.author,
        info.status.label(),
    )
}

/// Permalink to the originating Slack message.
fn message_permalink(subdomain: &str, channel_id: &str, ts: &str) -> String {
    format!(
        "https://{subdomain}.slack.com/archives/{channel_id}/p{}",
        ts.replace('.', "")
    )
}
