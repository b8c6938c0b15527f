//! Idempotent reaction planning.
//!
//! The planner is pure: it inspects a message's existing reactions and the
//! resolved references and decides what, if anything, to add. The caller
//! applies the returned action and owns per-action failure handling.

use std::collections::HashSet;

use crate::github::{PrInfo, PrStatus};
use crate::slack::RawMessage;

/// Reaction rule for one status category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiRule {
    bot_emoji: String,
    recognized: HashSet<String>,
}

impl EmojiRule {
    /// Creates a rule. The recognized set always contains the bot's own
    /// emoji, so a reaction the bot added on a previous run counts as
    /// already handled.
    #[must_use]
    pub fn new(bot_emoji: impl Into<String>, recognized: impl IntoIterator<Item = String>) -> Self {
        let own = bot_emoji.into();
        let mut set: HashSet<String> = recognized.into_iter().collect();
        set.insert(own.clone());
        Self {
            bot_emoji: own,
            recognized: set,
        }
    }

    /// The emoji this bot adds for the category.
    #[must_use]
    pub const fn bot_emoji(&self) -> &str {
        self.bot_emoji.as_str()
    }

    /// Whether an existing reaction name means "already handled".
    #[must_use]
    pub fn recognizes(&self, name: &str) -> bool {
        self.recognized.contains(name)
    }
}

/// Per-status reaction rules plus the "confused" emoji for ambiguous
/// messages.
///
/// Recognized sets are caller-supplied and may overlap across categories;
/// no disjointness is enforced. Needs-work carries no rule: the digest
/// covers it and the message gets no reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionConfiguration {
    merged: EmojiRule,
    approved: EmojiRule,
    commented: EmojiRule,
    confused: String,
}

impl ReactionConfiguration {
    /// Creates a configuration from per-category rules.
    #[must_use]
    pub fn new(
        merged: EmojiRule,
        approved: EmojiRule,
        commented: EmojiRule,
        confused: impl Into<String>,
    ) -> Self {
        Self {
            merged,
            approved,
            commented,
            confused: confused.into(),
        }
    }

    /// Emoji added to messages referencing more than one pull request.
    #[must_use]
    pub const fn confused_emoji(&self) -> &str {
        self.confused.as_str()
    }

    /// Rule for a status category; `None` for needs-work.
    #[must_use]
    pub const fn rule_for(&self, status: PrStatus) -> Option<&EmojiRule> {
        match status {
            PrStatus::Merged => Some(&self.merged),
            PrStatus::Approved => Some(&self.approved),
            PrStatus::Commented => Some(&self.commented),
            PrStatus::NeedsWork => None,
        }
    }
}

/// Action the planner decided on for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Nothing to do: no references, already reacted, or needs-work.
    NoOp,
    /// Add the named emoji to the message.
    AddEmoji(String),
    /// Mark the message as ambiguous (multiple references).
    MarkConfused,
}

/// Plans the reaction for one message given its surviving references.
///
/// Rules, in order: no references is a no-op; more than one reference is
/// ambiguous and gets the confused emoji (never a status emoji), except
/// when the confused emoji is already present; a single reference gets the
/// status category's emoji unless an equivalent reaction already exists.
#[must_use]
pub fn plan(
    message: &RawMessage,
    references: &[PrInfo],
    config: &ReactionConfiguration,
) -> PlannedAction {
    match references {
        [] => PlannedAction::NoOp,
        [only] => plan_single(message, only, config),
        _ => plan_confused(message, config),
    }
}

fn plan_confused(message: &RawMessage, config: &ReactionConfiguration) -> PlannedAction {
    if message
        .reactions
        .iter()
        .any(|name| name == config.confused_emoji())
    {
        PlannedAction::NoOp
    } else {
        PlannedAction::MarkConfused
    }
}

fn plan_single(
    message: &RawMessage,
    reference: &PrInfo,
    config: &ReactionConfiguration,
) -> PlannedAction {
    config
        .rule_for(reference.status)
        .map_or(PlannedAction::NoOp, |rule| {
            if message.reactions.iter().any(|name| rule.recognizes(name)) {
                PlannedAction::NoOp
            } else {
                PlannedAction::AddEmoji(rule.bot_emoji().to_owned())
            }
        })
}

#[cfg(test)]
mod tests {
    use super::{EmojiRule, PlannedAction, ReactionConfiguration, plan};
    use crate::github::{PrInfo, PrStatus, PullRequestLocator};
    use crate::slack::RawMessage;

    fn config() -> ReactionConfiguration {
        ReactionConfiguration::new(
            EmojiRule::new("package", vec!["merged".to_owned()]),
            EmojiRule::new(
                "white_check_mark",
                vec!["bufo-gives-approval".to_owned(), "approved".to_owned()],
            ),
            EmojiRule::new("speech_balloon", vec![]),
            "question",
        )
    }

    fn info(url: &str, status: PrStatus) -> PrInfo {
        PrInfo {
            locator: PullRequestLocator::parse(url).expect("URL should parse"),
            status,
            author: "alice".to_owned(),
            title: "Add widgets".to_owned(),
        }
    }

    fn message(reactions: &[&str]) -> RawMessage {
        RawMessage {
            ts: "1700000000.000100".to_owned(),
            text: String::new(),
            reactions: reactions.iter().map(|&name| name.to_owned()).collect(),
        }
    }

    #[test]
    fn no_references_is_a_noop() {
        assert_eq!(plan(&message(&[]), &[], &config()), PlannedAction::NoOp);
    }

    #[test]
    fn merged_reference_gets_the_configured_emoji() {
        let references = [info("https://github.com/acme/widgets/pull/42", PrStatus::Merged)];
        assert_eq!(
            plan(&message(&[]), &references, &config()),
            PlannedAction::AddEmoji("package".to_owned())
        );
    }

    #[test]
    fn own_emoji_already_present_is_a_noop() {
        let references = [info("https://github.com/acme/widgets/pull/42", PrStatus::Merged)];
        assert_eq!(
            plan(&message(&["package"]), &references, &config()),
            PlannedAction::NoOp
        );
    }

    #[test]
    fn recognized_equivalent_is_a_noop() {
        let references = [info(
            "https://github.com/acme/widgets/pull/42",
            PrStatus::Approved,
        )];
        assert_eq!(
            plan(&message(&["bufo-gives-approval"]), &references, &config()),
            PlannedAction::NoOp
        );
    }

    #[test]
    fn unrelated_reactions_do_not_suppress() {
        let references = [info(
            "https://github.com/acme/widgets/pull/42",
            PrStatus::Approved,
        )];
        assert_eq!(
            plan(&message(&["tada", "eyes"]), &references, &config()),
            PlannedAction::AddEmoji("white_check_mark".to_owned())
        );
    }

    #[test]
    fn needs_work_has_no_reaction() {
        let references = [info(
            "https://github.com/acme/widgets/pull/42",
            PrStatus::NeedsWork,
        )];
        assert_eq!(plan(&message(&[]), &references, &config()), PlannedAction::NoOp);
    }

    #[test]
    fn two_references_are_confused_regardless_of_status() {
        let references = [
            info("https://github.com/acme/widgets/pull/42", PrStatus::Merged),
            info("https://github.com/acme/widgets/pull/43", PrStatus::Approved),
        ];
        assert_eq!(
            plan(&message(&[]), &references, &config()),
            PlannedAction::MarkConfused
        );
    }

    #[test]
    fn confused_is_not_re_marked() {
        let references = [
            info("https://github.com/acme/widgets/pull/42", PrStatus::Merged),
            info("https://github.com/acme/widgets/pull/43", PrStatus::Approved),
        ];
        assert_eq!(
            plan(&message(&["question"]), &references, &config()),
            PlannedAction::NoOp
        );
    }

    #[test]
    fn commented_reference_gets_the_commented_emoji() {
        let references = [info(
            "https://github.com/acme/widgets/pull/42",
            PrStatus::Commented,
        )];
        assert_eq!(
            plan(&message(&[]), &references, &config()),
            PlannedAction::AddEmoji("speech_balloon".to_owned())
        );
    }
}
