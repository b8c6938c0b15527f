//! Per-channel reference deduplication.

use std::collections::HashSet;

use crate::github::PullRequestLocator;

/// Seen-set of canonical URLs for one channel's scan.
///
/// Scope is strictly per-channel: build a fresh instance for every channel
/// so the same reference posted in two channels is processed independently.
/// First occurrence wins; later occurrences are dropped, not re-resolved,
/// even when the first occurrence failed to resolve.
#[derive(Debug, Default)]
pub struct SeenReferences {
    seen: HashSet<String>,
}

impl SeenReferences {
    /// Creates an empty seen-set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a reference, returning true only on first sight.
    pub fn accept(&mut self, locator: &PullRequestLocator) -> bool {
        self.seen.insert(locator.canonical_url())
    }
}

#[cfg(test)]
mod tests {
    use super::SeenReferences;
    use crate::github::PullRequestLocator;

    fn locator(url: &str) -> PullRequestLocator {
        PullRequestLocator::parse(url).expect("URL should parse")
    }

    #[test]
    fn first_sight_is_accepted_repeats_are_not() {
        let mut seen = SeenReferences::new();
        let reference = locator("https://github.com/acme/widgets/pull/42");
        assert!(seen.accept(&reference));
        assert!(!seen.accept(&reference));
        assert!(!seen.accept(&reference));
    }

    #[test]
    fn distinct_references_are_all_accepted() {
        let mut seen = SeenReferences::new();
        assert!(seen.accept(&locator("https://github.com/acme/widgets/pull/42")));
        assert!(seen.accept(&locator("https://github.com/acme/widgets/pull/43")));
        assert!(seen.accept(&locator("https://github.com/acme/gears/pull/42")));
    }

    #[test]
    fn equivalent_urls_share_one_slot() {
        let mut seen = SeenReferences::new();
        assert!(seen.accept(&locator("https://github.com/acme/widgets/pull/42")));
        assert!(!seen.accept(&locator("https://github.com/acme/widgets/pull/42/files")));
    }
}
