//! Trait-based chat gateway and its Slack Web API implementation.
//!
//! The trait-based design enables mocking in tests while
//! [`HttpSlackGateway`] handles real HTTP requests. Every Slack method is
//! invoked as a form-encoded POST (the Web API accepts POST uniformly),
//! and the `ok`/`error` envelope is unwrapped into [`SlackError`] values.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::SlackError;
use super::models::{Ack, ChannelPayload, HistoryPayload, RawMessage};

/// Chat capability consumed by the triage engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Fetch the display name of a channel.
    async fn channel_name(&self, channel_id: &str) -> Result<String, SlackError>;

    /// Fetch message history for a channel, oldest bound in epoch seconds.
    async fn history(
        &self,
        channel_id: &str,
        oldest_epoch: i64,
    ) -> Result<Vec<RawMessage>, SlackError>;

    /// Add an emoji reaction to a message.
    async fn add_reaction(&self, channel_id: &str, ts: &str, emoji: &str)
    -> Result<(), SlackError>;

    /// Post a message to a channel.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError>;

    /// Post a direct message to a user.
    async fn post_direct_message(&self, user_id: &str, text: &str) -> Result<(), SlackError>;
}

/// Slack Web API gateway using bot-token bearer auth.
#[derive(Debug, Clone)]
pub struct HttpSlackGateway {
    client: Client,
    base: Url,
    token: String,
}

/// Response envelope shared by every Slack Web API method.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    payload: T,
}

impl HttpSlackGateway {
    /// Creates a gateway against an explicit base URL.
    ///
    /// Production code uses [`Self::for_workspace`]; tests point this at a
    /// mock server.
    #[must_use]
    pub fn new(base: Url, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base,
            token: token.into(),
        }
    }

    /// Creates a gateway for `https://<subdomain>.slack.com/`.
    ///
    /// # Errors
    ///
    /// Returns [`SlackError::InvalidBaseUrl`] when the subdomain does not
    /// form a valid URL.
    pub fn for_workspace(subdomain: &str, token: impl Into<String>) -> Result<Self, SlackError> {
        let base = Url::parse(&format!("https://{subdomain}.slack.com/")).map_err(|error| {
            SlackError::InvalidBaseUrl {
                message: error.to_string(),
            }
        })?;
        Ok(Self::new(base, token))
    }

    fn endpoint(&self, method: &str) -> Result<Url, SlackError> {
        self.base
            .join(&format!("api/{method}"))
            .map_err(|error| SlackError::InvalidBaseUrl {
                message: error.to_string(),
            })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        form: &[(&str, &str)],
    ) -> Result<T, SlackError> {
        let url = self.endpoint(method)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .form(form)
            .send()
            .await
            .map_err(|error| SlackError::Network {
                method: method.to_owned(),
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Http {
                method: method.to_owned(),
                status,
                message: body,
            });
        }

        let envelope: Envelope<T> =
            response
                .json()
                .await
                .map_err(|error| SlackError::MalformedResponse {
                    method: method.to_owned(),
                    message: error.to_string(),
                })?;

        unwrap_envelope(method, envelope)
    }
}

fn unwrap_envelope<T>(method: &str, envelope: Envelope<T>) -> Result<T, SlackError> {
    if envelope.ok {
        Ok(envelope.payload)
    } else {
        let code = envelope
            .error
            .unwrap_or_else(|| "unknown error".to_owned());
        Err(map_api_error(method, code))
    }
}

fn map_api_error(method: &str, code: String) -> SlackError {
    if matches!(
        code.as_str(),
        "invalid_auth" | "not_authed" | "account_inactive" | "token_revoked"
    ) {
        SlackError::Authentication {
            method: method.to_owned(),
            code,
        }
    } else {
        SlackError::Api {
            method: method.to_owned(),
            code,
        }
    }
}

#[async_trait]
impl ChatGateway for HttpSlackGateway {
    async fn channel_name(&self, channel_id: &str) -> Result<String, SlackError> {
        let payload: ChannelPayload = self
            .call("conversations.info", &[("channel", channel_id)])
            .await?;
        payload
            .channel
            .and_then(|channel| channel.name)
            .ok_or_else(|| SlackError::MalformedResponse {
                method: "conversations.info".to_owned(),
                message: "channel name is missing".to_owned(),
            })
    }

    async fn history(
        &self,
        channel_id: &str,
        oldest_epoch: i64,
    ) -> Result<Vec<RawMessage>, SlackError> {
        let oldest = oldest_epoch.to_string();
        let payload: HistoryPayload = self
            .call(
                "conversations.history",
                &[("channel", channel_id), ("oldest", &oldest)],
            )
            .await?;
        Ok(payload.messages.into_iter().map(RawMessage::from).collect())
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        ts: &str,
        emoji: &str,
    ) -> Result<(), SlackError> {
        let _: Ack = self
            .call(
                "reactions.add",
                &[("channel", channel_id), ("timestamp", ts), ("name", emoji)],
            )
            .await?;
        Ok(())
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), SlackError> {
        let _: Ack = self
            .call("chat.postMessage", &[("channel", channel_id), ("text", text)])
            .await?;
        Ok(())
    }

    async fn post_direct_message(&self, user_id: &str, text: &str) -> Result<(), SlackError> {
        let payload: ChannelPayload = self
            .call("conversations.open", &[("users", user_id)])
            .await?;
        let dm_channel = payload
            .channel
            .and_then(|channel| channel.id)
            .ok_or_else(|| SlackError::MalformedResponse {
                method: "conversations.open".to_owned(),
                message: "DM channel id is missing".to_owned(),
            })?;
        self.post_message(&dm_channel, text).await
    }
}
