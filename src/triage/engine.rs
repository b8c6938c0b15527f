//! The triage engine: one run over the configured channels.
//!
//! Failure isolation policy: history fetches and digest posts propagate
//! their errors, a failed channel-name lookup falls back to the raw id,
//! and per-reference or per-reaction failures are logged and the run
//! continues. Side effects honour the request's enable flags, so a dry run
//! scans and resolves without touching Slack.

use chrono::{DateTime, Local, TimeDelta};
use tracing::{debug, info, warn};

use crate::github::{PrInfo, PullRequestLocator, StatusOracle};
use crate::slack::{ChannelInfo, ChatGateway, RawMessage, SlackError};

use super::dedup::SeenReferences;
use super::extract::extract_references;
use super::planner::{PlannedAction, ReactionConfiguration, plan};
use super::summary::{
    ChannelSummary, DIGEST_HEADER, SummaryEntry, compose_channel_digest, compose_recipient_digest,
};
use super::timefmt::parse_slack_timestamp;

/// How long an earlier digest suppresses re-posting to the same channel.
const DIGEST_SUPPRESSION_HOURS: i64 = 12;

/// Errors that abort a triage run outright.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// The chat workspace rejected or failed a request fatally.
    #[error(transparent)]
    Chat(#[from] SlackError),
    /// No Slack token was found in configuration or the environment.
    #[error("no Slack token is configured; set PATROL_SLACK_TOKEN or SLACK_BOT_TOKEN")]
    MissingSlackToken,
    /// No workspace subdomain was configured.
    #[error("no workspace subdomain is configured")]
    MissingSubdomain,
    /// The channel list was empty.
    #[error("no channels are configured")]
    NoChannels,
    /// Configuration values could not be interpreted.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Explanation of what was rejected.
        message: String,
    },
    /// Writing run output failed.
    #[error("I/O error: {message}")]
    Io {
        /// Underlying error description.
        message: String,
    },
}

/// Everything one run needs, resolved from configuration up front.
#[derive(Debug, Clone)]
pub struct TriageRequest {
    /// Channel IDs to scan.
    pub channels: Vec<String>,
    /// How far back to fetch history.
    pub lookback: TimeDelta,
    /// Whether to actually add reactions.
    pub reactions_enabled: bool,
    /// Whether to post per-channel digests.
    pub channel_messages_enabled: bool,
    /// User IDs that receive the cross-channel digest by DM.
    pub summary_recipients: Vec<String>,
    /// Per-status reaction rules.
    pub reactions: ReactionConfiguration,
    /// Workspace subdomain, used to build message permalinks.
    pub workspace_subdomain: String,
}

/// A reference that was seen but dropped from a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReference {
    /// Channel the reference appeared in.
    pub channel: String,
    /// Canonical URL of the reference.
    pub reference: String,
    /// Why it was dropped.
    pub reason: String,
}

/// Tally of what one run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TriageOutcome {
    /// Channels whose history was fetched and walked.
    pub channels_scanned: usize,
    /// Messages inspected across all channels, digests excluded.
    pub messages_scanned: usize,
    /// Reactions added.
    pub reactions_added: usize,
    /// References dropped because resolution failed.
    pub skipped_references: Vec<SkippedReference>,
}

/// Drives one reconciliation run against a chat gateway and a status
/// oracle.
pub struct TriageEngine<'a> {
    chat: &'a dyn ChatGateway,
    oracle: &'a dyn StatusOracle,
}

impl<'a> TriageEngine<'a> {
    /// Creates an engine over the given capabilities.
    #[must_use]
    pub const fn new(chat: &'a dyn ChatGateway, oracle: &'a dyn StatusOracle) -> Self {
        Self { chat, oracle }
    }

    /// Runs one full reconciliation pass.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Chat`] when authentication fails, or when a
    /// history fetch or digest post fails. Oracle and reaction failures are
    /// downgraded to log lines or recorded in
    /// [`TriageOutcome::skipped_references`].
    pub async fn run(&self, request: &TriageRequest) -> Result<TriageOutcome, TriageError> {
        let now = Local::now();
        let oldest_epoch = (now.to_utc() - request.lookback).timestamp();
        let mut outcome = TriageOutcome::default();
        let mut summaries = Vec::with_capacity(request.channels.len());

        for channel_id in &request.channels {
            let channel = self.load_channel(channel_id).await?;
            let messages = self.chat.history(channel_id, oldest_epoch).await?;

            outcome.channels_scanned += 1;
            let summary = self
                .scan_channel(&channel, messages, request, now, &mut outcome)
                .await?;
            summaries.push(summary);
        }

        self.dispatch_recipient_digests(&summaries, request, now)
            .await?;

        info!(
            channels = outcome.channels_scanned,
            messages = outcome.messages_scanned,
            reactions = outcome.reactions_added,
            skipped = outcome.skipped_references.len(),
            "triage run finished"
        );
        Ok(outcome)
    }

    /// Resolves a channel ID to its display name, falling back to the raw
    /// id when the metadata lookup fails.
    async fn load_channel(&self, channel_id: &str) -> Result<ChannelInfo, TriageError> {
        match self.chat.channel_name(channel_id).await {
            Ok(name) => Ok(ChannelInfo {
                id: channel_id.to_owned(),
                name,
            }),
            Err(error) if is_fatal(&error) => Err(error.into()),
            Err(error) => {
                warn!(channel = %channel_id, %error, "channel name lookup failed, using the id");
                Ok(ChannelInfo {
                    id: channel_id.to_owned(),
                    name: channel_id.to_owned(),
                })
            }
        }
    }

    /// Walks one channel's history in chronological order.
    async fn scan_channel(
        &self,
        channel: &ChannelInfo,
        mut messages: Vec<RawMessage>,
        request: &TriageRequest,
        now: DateTime<Local>,
        outcome: &mut TriageOutcome,
    ) -> Result<ChannelSummary, TriageError> {
        messages.sort_by_key(|message| ts_order_key(&message.ts));
        let digest_recently_posted = recently_reported(&messages, now);
        let mut seen = SeenReferences::new();
        let mut entries = Vec::new();

        for message in &messages {
            // The bot's own digests carry PR links; never triage them.
            if message.text.contains(DIGEST_HEADER) {
                continue;
            }
            outcome.messages_scanned += 1;

            let fresh: Vec<PullRequestLocator> = extract_references(&message.text)
                .into_iter()
                .filter(|locator| seen.accept(locator))
                .collect();
            if fresh.is_empty() {
                continue;
            }

            let resolved = self.resolve_references(&channel.id, &fresh, outcome).await;
            match plan(message, &resolved, &request.reactions) {
                PlannedAction::NoOp => {}
                PlannedAction::AddEmoji(emoji) => {
                    self.apply_reaction(channel, message, &emoji, request, outcome)
                        .await;
                }
                PlannedAction::MarkConfused => {
                    self.apply_reaction(
                        channel,
                        message,
                        request.reactions.confused_emoji(),
                        request,
                        outcome,
                    )
                    .await;
                }
            }

            entries.extend(resolved.into_iter().map(|info| SummaryEntry {
                info,
                message_ts: message.ts.clone(),
            }));
        }

        let summary = ChannelSummary {
            channel: channel.clone(),
            entries,
        };
        self.post_channel_digest(&summary, digest_recently_posted, request, now)
            .await?;
        Ok(summary)
    }

    /// Resolves each fresh reference once, recording failures as skips.
    async fn resolve_references(
        &self,
        channel_id: &str,
        fresh: &[PullRequestLocator],
        outcome: &mut TriageOutcome,
    ) -> Vec<PrInfo> {
        let mut resolved = Vec::with_capacity(fresh.len());
        for locator in fresh {
            match self.oracle.resolve(locator).await {
                Ok(info) => {
                    debug!(reference = %locator, status = info.status.label(), "resolved");
                    resolved.push(info);
                }
                Err(error) => {
                    warn!(reference = %locator, %error, "dropping unresolvable reference");
                    outcome.skipped_references.push(SkippedReference {
                        channel: channel_id.to_owned(),
                        reference: locator.canonical_url(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        resolved
    }

    async fn apply_reaction(
        &self,
        channel: &ChannelInfo,
        message: &RawMessage,
        emoji: &str,
        request: &TriageRequest,
        outcome: &mut TriageOutcome,
    ) {
        if !request.reactions_enabled {
            debug!(channel = %channel.name, ts = %message.ts, emoji, "reactions disabled, skipping");
            return;
        }
        match self.chat.add_reaction(&channel.id, &message.ts, emoji).await {
            Ok(()) => outcome.reactions_added += 1,
            Err(error) => {
                warn!(channel = %channel.name, ts = %message.ts, emoji, %error, "failed to add reaction");
            }
        }
    }

    async fn post_channel_digest(
        &self,
        summary: &ChannelSummary,
        digest_recently_posted: bool,
        request: &TriageRequest,
        now: DateTime<Local>,
    ) -> Result<(), TriageError> {
        if !request.channel_messages_enabled {
            return Ok(());
        }
        if digest_recently_posted {
            info!(channel = %summary.channel.name, "recent digest found, not re-posting");
            return Ok(());
        }
        let Some(text) = compose_channel_digest(summary, &request.workspace_subdomain, now) else {
            return Ok(());
        };
        self.chat.post_message(&summary.channel.id, &text).await?;
        Ok(())
    }

    async fn dispatch_recipient_digests(
        &self,
        summaries: &[ChannelSummary],
        request: &TriageRequest,
        now: DateTime<Local>,
    ) -> Result<(), TriageError> {
        let Some(text) = compose_recipient_digest(summaries, &request.workspace_subdomain, now)
        else {
            return Ok(());
        };
        for recipient in &request.summary_recipients {
            self.chat.post_direct_message(recipient, &text).await?;
        }
        Ok(())
    }
}

/// Failures that abort the run rather than skip the channel.
const fn is_fatal(error: &SlackError) -> bool {
    matches!(
        error,
        SlackError::Authentication { .. } | SlackError::InvalidBaseUrl { .. }
    )
}

/// Whether a digest was already posted inside the suppression window.
fn recently_reported(messages: &[RawMessage], now: DateTime<Local>) -> bool {
    let window = TimeDelta::hours(DIGEST_SUPPRESSION_HOURS);
    messages.iter().any(|message| {
        message.text.contains(DIGEST_HEADER)
            && parse_slack_timestamp(&message.ts)
                .is_some_and(|posted| now.signed_duration_since(posted) < window)
    })
}

/// Sort key placing messages in chronological order.
fn ts_order_key(ts: &str) -> (i64, i64) {
    let mut parts = ts.split('.');
    let seconds = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);
    let fraction = parts.next().and_then(|part| part.parse().ok()).unwrap_or(0);
    (seconds, fraction)
}
