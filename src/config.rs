//! Application configuration loaded from CLI, environment, and files.
//!
//! Values merge from command-line arguments, environment variables, and
//! configuration files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.patrol.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PATROL_CHANNELS`, `PATROL_SLACK_TOKEN`,
//!    or legacy `SLACK_BOT_TOKEN`
//! 4. **Command-line arguments** – `--subdomain`, `--days`, and friends
//!
//! # Configuration File
//!
//! Place `.patrol.toml` in the current directory, home directory, or XDG
//! config directory with:
//!
//! ```toml
//! subdomain = "acme"
//! channels = ["C0123456789", "C0987654321"]
//! days = 4
//! allow_reactions = true
//! allow_channel_messages = true
//! summary_user_ids = ["U0123456789"]
//! approved_recognized = "bufo-gives-approval,approved"
//! ```

use std::env;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::triage::{EmojiRule, ReactionConfiguration, TriageError, TriageRequest};

/// Days of history scanned when `days` is not configured.
const DEFAULT_LOOKBACK_DAYS: u32 = 4;

const DEFAULT_MERGED_EMOJI: &str = "package";
const DEFAULT_APPROVED_EMOJI: &str = "white_check_mark";
const DEFAULT_COMMENTED_EMOJI: &str = "speech_balloon";
const DEFAULT_CONFUSED_EMOJI: &str = "question";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PATROL_SUBDOMAIN` or `--subdomain`: Slack workspace subdomain
/// - `PATROL_SLACK_TOKEN`, `SLACK_BOT_TOKEN` (legacy), or `--slack-token`:
///   Bot token used for Web API calls
/// - `PATROL_CHANNELS`: Channel IDs to scan
/// - `PATROL_DAYS` or `--days`: History window in days
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PATROL",
    discovery(
        dotfile_name = ".patrol.toml",
        config_file_name = "patrol.toml",
        app_name = "patrol"
    )
)]
pub struct PatrolConfig {
    /// Slack channel IDs to scan.
    pub channels: Vec<String>,

    /// Slack workspace subdomain (the `acme` in `acme.slack.com`).
    ///
    /// Can be provided via:
    /// - CLI: `--subdomain <NAME>` or `-s <NAME>`
    /// - Environment: `PATROL_SUBDOMAIN`
    /// - Config file: `subdomain = "..."`
    #[ortho_config(cli_short = 's')]
    pub subdomain: Option<String>,

    /// Bot token for Slack Web API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--slack-token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PATROL_SLACK_TOKEN` or `SLACK_BOT_TOKEN` (legacy)
    /// - Config file: `slack_token = "..."`
    #[ortho_config(cli_short = 't')]
    pub slack_token: Option<String>,

    /// How many days of channel history to scan. Defaults to 4.
    #[ortho_config(cli_short = 'd')]
    pub days: Option<u32>,

    /// Whether to add reactions. Defaults to true; disable for a dry run.
    pub allow_reactions: Option<bool>,

    /// Whether to post per-channel digests. Defaults to true.
    pub allow_channel_messages: Option<bool>,

    /// User IDs that receive the cross-channel digest by DM.
    pub summary_user_ids: Vec<String>,

    /// Emoji added to messages whose pull request has merged.
    pub merged_emoji: Option<String>,

    /// Comma-separated emoji names also treated as "merged" markers.
    pub merged_recognized: Option<String>,

    /// Emoji added to messages whose pull request is approved.
    pub approved_emoji: Option<String>,

    /// Comma-separated emoji names also treated as "approved" markers.
    pub approved_recognized: Option<String>,

    /// Emoji added to messages whose pull request has review comments.
    pub commented_emoji: Option<String>,

    /// Comma-separated emoji names also treated as "commented" markers.
    pub commented_recognized: Option<String>,

    /// Emoji added to messages referencing more than one pull request.
    pub confused_emoji: Option<String>,
}

impl PatrolConfig {
    /// Resolves the bot token from configuration or the legacy
    /// `SLACK_BOT_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::MissingSlackToken`] when no source provides a
    /// value.
    pub fn resolve_slack_token(&self) -> Result<String, TriageError> {
        self.slack_token
            .clone()
            .or_else(|| env::var("SLACK_BOT_TOKEN").ok())
            .ok_or(TriageError::MissingSlackToken)
    }

    /// Returns the workspace subdomain or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::MissingSubdomain`] when no subdomain is
    /// configured.
    pub fn require_subdomain(&self) -> Result<&str, TriageError> {
        self.subdomain
            .as_deref()
            .ok_or(TriageError::MissingSubdomain)
    }

    /// History window as a duration.
    #[must_use]
    pub fn lookback(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.days.unwrap_or(DEFAULT_LOOKBACK_DAYS)))
    }

    /// Builds the reaction rules, falling back to the stock emoji set.
    #[must_use]
    pub fn reaction_configuration(&self) -> ReactionConfiguration {
        ReactionConfiguration::new(
            self.rule(&self.merged_emoji, DEFAULT_MERGED_EMOJI, &self.merged_recognized),
            self.rule(
                &self.approved_emoji,
                DEFAULT_APPROVED_EMOJI,
                &self.approved_recognized,
            ),
            self.rule(
                &self.commented_emoji,
                DEFAULT_COMMENTED_EMOJI,
                &self.commented_recognized,
            ),
            self.confused_emoji
                .clone()
                .unwrap_or_else(|| DEFAULT_CONFUSED_EMOJI.to_owned()),
        )
    }

    /// Validates the configuration and assembles one run's request.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::NoChannels`] or
    /// [`TriageError::MissingSubdomain`] when required values are absent.
    pub fn triage_request(&self) -> Result<TriageRequest, TriageError> {
        if self.channels.is_empty() {
            return Err(TriageError::NoChannels);
        }
        let subdomain = self.require_subdomain()?;
        Ok(TriageRequest {
            channels: self.channels.clone(),
            lookback: self.lookback(),
            reactions_enabled: self.allow_reactions.unwrap_or(true),
            channel_messages_enabled: self.allow_channel_messages.unwrap_or(true),
            summary_recipients: self.summary_user_ids.clone(),
            reactions: self.reaction_configuration(),
            workspace_subdomain: subdomain.to_owned(),
        })
    }

    fn rule(&self, emoji: &Option<String>, stock: &str, recognized: &Option<String>) -> EmojiRule {
        EmojiRule::new(
            emoji.clone().unwrap_or_else(|| stock.to_owned()),
            split_csv(recognized.as_deref()),
        )
    }
}

/// Splits a comma-separated list, trimming entries and dropping empties.
fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
