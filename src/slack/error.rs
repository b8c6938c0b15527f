//! Error types exposed by the Slack gateway.

use http::StatusCode;
use thiserror::Error;

/// Errors surfaced while talking to the Slack Web API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SlackError {
    /// The workspace base URL could not be constructed.
    #[error("invalid Slack base URL: {message}")]
    InvalidBaseUrl {
        /// URL parse error detail.
        message: String,
    },

    /// Networking failed before a response arrived.
    #[error("network error calling {method}: {message}")]
    Network {
        /// Slack Web API method name.
        method: String,
        /// Transport-level error detail.
        message: String,
    },

    /// Slack answered with a non-success HTTP status.
    #[error("{method} returned HTTP {status}: {message}")]
    Http {
        /// Slack Web API method name.
        method: String,
        /// HTTP status code of the response.
        status: StatusCode,
        /// Response body, when readable.
        message: String,
    },

    /// Slack rejected the credentials.
    #[error("Slack rejected the token on {method}: {code}")]
    Authentication {
        /// Slack Web API method name.
        method: String,
        /// Slack error code (e.g. `invalid_auth`).
        code: String,
    },

    /// Slack reported an application-level error in the `ok: false` envelope.
    #[error("{method} failed: {code}")]
    Api {
        /// Slack Web API method name.
        method: String,
        /// Slack error code (e.g. `channel_not_found`).
        code: String,
    },

    /// The response body could not be interpreted.
    #[error("unexpected response from {method}: {message}")]
    MalformedResponse {
        /// Slack Web API method name.
        method: String,
        /// Parse error detail.
        message: String,
    },
}
