//! Slack chat capability: message history, reactions, and message posting.
//!
//! The engine only depends on the [`ChatGateway`] trait; the HTTP
//! implementation wraps the Slack Web API with bot-token bearer auth and
//! maps the `ok: false` response envelope into typed errors.

pub mod error;
pub mod gateway;
pub mod models;

pub use error::SlackError;
pub use gateway::{ChatGateway, HttpSlackGateway};
pub use models::{ChannelInfo, RawMessage};

#[cfg(test)]
pub use gateway::MockChatGateway;
