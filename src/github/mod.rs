//! Pull request references and review-state resolution.
//!
//! This module parses pull request URLs found in chat messages, models the
//! review record returned by the GitHub CLI, and classifies each reference
//! into a closed review-state enum. The oracle is trait-based so the
//! subprocess implementation can be swapped for a direct network client
//! without touching the reconciliation logic.

pub mod error;
pub mod locator;
pub mod models;
pub mod oracle;
pub mod status;

pub use error::{ReferenceError, ResolveError};
pub use locator::{PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner};
pub use models::{RecordAuthor, ReviewEntry, ReviewRecord};
pub use oracle::{GhCliOracle, StatusOracle};
pub use status::{PrInfo, PrStatus};

#[cfg(test)]
pub use oracle::MockStatusOracle;
