//! Review-state classification for pull request references.

use super::locator::PullRequestLocator;
use super::models::ReviewRecord;

/// Reviewer logins treated as automated and excluded from the "commented"
/// classification. Compared lowercased. There is no general bot-detection
/// signal; a human whose login collides with this list is misclassified.
const KNOWN_AUTOMATED_REVIEWERS: [&str; 3] = ["cursor", "chatgpt-codex-connector", "graphite-app"];

/// Closed set of review states a reference can resolve to.
///
/// Every consumption site (reaction lookup, digest labels) matches this
/// exhaustively rather than comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrStatus {
    /// No qualifying review activity yet.
    NeedsWork,
    /// At least one qualifying review exists, but no approval.
    Commented,
    /// GitHub's review decision is approved.
    Approved,
    /// The pull request has merged.
    Merged,
}

impl PrStatus {
    /// Human-readable label used in digest lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsWork => "needs work",
            Self::Commented => "commented",
            Self::Approved => "approved",
            Self::Merged => "merged",
        }
    }
}

/// Resolved facts about one pull request reference.
///
/// Produced at most once per distinct canonical URL per channel scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrInfo {
    /// The normalized reference this record describes.
    pub locator: PullRequestLocator,
    /// Resolved review state.
    pub status: PrStatus,
    /// Pull request author login, or `unknown` when the record omits it.
    pub author: String,
    /// Pull request title, or `owner/repo#number` when the record omits it.
    pub title: String,
}

impl PrInfo {
    /// Builds a `PrInfo` from an oracle record.
    #[must_use]
    pub fn from_record(locator: PullRequestLocator, record: &ReviewRecord) -> Self {
        let author = record
            .author
            .as_ref()
            .and_then(|author| author.login.clone())
            .unwrap_or_else(|| "unknown".to_owned());
        let title = record
            .title
            .clone()
            .unwrap_or_else(|| locator.fallback_title());
        let status = classify(record, &author);
        Self {
            locator,
            status,
            author,
            title,
        }
    }
}

/// Classifies a review record. Precedence, first match wins: merged,
/// approved, commented (at least one qualifying review), needs work.
fn classify(record: &ReviewRecord, pr_author: &str) -> PrStatus {
    if record.merged_at.is_some() {
        return PrStatus::Merged;
    }

    if record.review_decision.as_deref() == Some("APPROVED") {
        return PrStatus::Approved;
    }

    let has_qualifying_review = record.reviews.iter().any(|review| {
        review
            .author
            .as_ref()
            .and_then(|author| author.login.as_deref())
            .is_some_and(|login| is_qualifying_reviewer(login, pr_author))
    });

    if has_qualifying_review {
        PrStatus::Commented
    } else {
        PrStatus::NeedsWork
    }
}

/// A qualifying review comes from a non-automated reviewer who is not the
/// pull request's own author.
fn is_qualifying_reviewer(login: &str, pr_author: &str) -> bool {
    let lowered = login.to_lowercase();
    !KNOWN_AUTOMATED_REVIEWERS
        .iter()
        .any(|automated| *automated == lowered)
        && login != pr_author
}
