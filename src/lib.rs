//! Patrol library crate providing Slack pull-request triage.
//!
//! The library scans Slack channel history for GitHub pull request links,
//! resolves each link's review state through a status oracle (the `gh`
//! command-line tool by default), and plans idempotent emoji reactions and
//! digest messages. Repeated runs over the same window never double-react
//! or double-report.

pub mod config;
pub mod github;
pub mod slack;
pub mod triage;

pub use config::PatrolConfig;
pub use github::{GhCliOracle, PrInfo, PrStatus, PullRequestLocator, ResolveError, StatusOracle};
pub use slack::{ChannelInfo, ChatGateway, HttpSlackGateway, RawMessage, SlackError};
pub use triage::{
    ChannelSummary, EmojiRule, PlannedAction, ReactionConfiguration, SummaryEntry, TriageEngine,
    TriageError, TriageOutcome, TriageRequest,
};
