//! Reconciliation pipeline: extraction, dedup, planning, and digests.
//!
//! The submodules are pure and synchronous; [`engine`] drives them against
//! the chat gateway and the status oracle and owns all failure-isolation
//! policy (a bad message, reference, or reaction never aborts a run).

pub mod dedup;
pub mod engine;
pub mod extract;
pub mod planner;
pub mod summary;
pub mod timefmt;

pub use engine::{SkippedReference, TriageEngine, TriageError, TriageOutcome, TriageRequest};
pub use planner::{EmojiRule, PlannedAction, ReactionConfiguration};
pub use summary::{ChannelSummary, DIGEST_HEADER, SummaryEntry};
