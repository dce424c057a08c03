//! Send API client: POST one message per call to `/{version}/me/messages`.

use crate::config::{self, Config};
use crate::messenger::outbound::OutboundMessage;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("send api request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("send api error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("page access token not configured")]
    MissingToken,
}

/// Delivers outbound messages to a user. Single attempt; callers decide what to do with failures.
#[async_trait]
pub trait SendApi: Send + Sync {
    async fn send(&self, recipient: &str, message: &OutboundMessage) -> Result<(), SendError>;
}

/// Graph API implementation of [`SendApi`].
#[derive(Clone)]
pub struct GraphSendClient {
    messages_url: String,
    page_token: Option<String>,
    client: reqwest::Client,
}

impl GraphSendClient {
    pub fn new(base_url: &str, api_version: &str, page_token: Option<String>) -> Self {
        let messages_url = format!(
            "{}/{}/me/messages",
            base_url.trim_end_matches('/'),
            api_version.trim_matches('/')
        );
        Self {
            messages_url,
            page_token,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.messenger.graph_api_base,
            &config.messenger.graph_api_version,
            config::resolve_page_token(config),
        )
    }

    pub fn messages_url(&self) -> &str {
        &self.messages_url
    }
}

#[async_trait]
impl SendApi for GraphSendClient {
    async fn send(&self, recipient: &str, message: &OutboundMessage) -> Result<(), SendError> {
        let token = self.page_token.as_ref().ok_or(SendError::MissingToken)?;
        let res = self
            .client
            .post(&self.messages_url)
            .query(&[("access_token", token.as_str())])
            .json(&message.envelope(recipient))
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SendError::Api { status, body });
        }
        Ok(())
    }
}
