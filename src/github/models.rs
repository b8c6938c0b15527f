//! Data models for the review record returned by the status oracle.
//!
//! Field names mirror the JSON emitted by
//! `gh pr view --json mergedAt,reviewDecision,author,reviews,title`.

use serde::Deserialize;

/// Review record for one pull request, as reported by the oracle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewRecord {
    /// Merge timestamp; present only once the pull request has merged.
    pub merged_at: Option<String>,
    /// Aggregate review decision (e.g. `APPROVED`), when GitHub computed one.
    pub review_decision: Option<String>,
    /// Pull request author.
    pub author: Option<RecordAuthor>,
    /// Reviews submitted against the pull request.
    pub reviews: Vec<ReviewEntry>,
    /// Pull request title.
    pub title: Option<String>,
}

/// Author attached to a pull request or review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecordAuthor {
    /// Account login.
    pub login: Option<String>,
    /// Whether GitHub marks the account as a bot. Carried through from the
    /// record but not used for review filtering; see
    /// [`crate::github::status`] for the fixed-allowlist heuristic.
    #[serde(rename = "is_bot")]
    pub is_bot: bool,
}

/// A single review on a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReviewEntry {
    /// Review author.
    pub author: Option<RecordAuthor>,
}
