//! Pull request reference extraction from message text.

use std::collections::HashSet;

use crate::github::PullRequestLocator;

/// Extracts pull request references from message text.
///
/// Total and pure: malformed or absent URLs produce an empty result, never
/// an error, so one bad message cannot abort a channel scan. Slack's
/// `<url>` and `<url|label>` link wrapping and trailing punctuation are
/// tolerated. Duplicate canonical URLs within the same message collapse to
/// one entry; distinct references keep first-seen order.
#[must_use]
pub fn extract_references(text: &str) -> Vec<PullRequestLocator> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for token in text.split_whitespace() {
        let Some(candidate) = candidate_url(token) else {
            continue;
        };
        let Ok(locator) = PullRequestLocator::parse(candidate) else {
            continue;
        };
        if seen.insert(locator.canonical_url()) {
            found.push(locator);
        }
    }
    found
}

/// Strips chat markup from a whitespace-separated token and returns the
/// URL candidate inside it, if any.
fn candidate_url(token: &str) -> Option<&str> {
    let opened = token.trim_start_matches(['<', '(', '[', '*', '_', '~', '`']);
    let clipped = opened.trim_end_matches(['>', ')', ']', ',', '.', ';', ':', '!', '?', '*', '_', '~', '`']);
    // Slack renders labelled links as <url|label>.
    let bare = clipped.split('|').next()?;
    if bare.starts_with("https://") {
        Some(bare)
    } else {
        None
    }
}
