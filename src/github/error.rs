//! Error types exposed by the pull request reference and oracle layer.

use thiserror::Error;

/// Errors surfaced while parsing a candidate pull request URL.
///
/// The reference extractor swallows these: a malformed candidate is simply
/// not a reference, so one bad message can never abort a channel scan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// The candidate could not be parsed as a URL at all.
    #[error("pull request URL is invalid: {0}")]
    InvalidUrl(String),

    /// The URL scheme is not HTTPS.
    #[error("pull request URL must use https")]
    UnsupportedScheme,

    /// The URL path is not `/owner/repo/pull/<number>`.
    #[error("pull request URL must match /owner/repo/pull/<number>")]
    MissingPathSegments,

    /// The pull request number is not a positive integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,
}

/// Errors surfaced while resolving a reference's review state.
///
/// The resolver never retries; whether to skip the reference or abort the
/// run is the caller's decision.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The oracle command could not be launched.
    #[error("failed to launch status oracle: {message}")]
    Launch {
        /// Error detail from the failed spawn.
        message: String,
    },

    /// The oracle command ran but reported failure.
    #[error("status lookup failed for {reference}: {message}")]
    Lookup {
        /// Canonical URL of the reference being resolved.
        reference: String,
        /// Stderr output or exit detail from the oracle.
        message: String,
    },

    /// The oracle produced output that could not be parsed.
    #[error("unparseable status record for {reference}: {message}")]
    MalformedRecord {
        /// Canonical URL of the reference being resolved.
        reference: String,
        /// Parse error detail.
        message: String,
    },
}
