//! Client for the external IPTV orchestration host's channel CRUD API.
//!
//! The host owns the actual stream inventory and channel numbering
//! surface; Teamarr only mirrors a subset of it locally
//! ([`crate::entities::managed_channel`]) to drive EPG generation and
//! lifecycle bookkeeping.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::config::HostConfig;
use crate::errors::{HostError, HostResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostStream {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostChannel {
    pub id: String,
    pub name: String,
    pub number: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub number: i32,
    pub stream_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreateChannelResponse {
    id: String,
}

/// The operations Teamarr's lifecycle manager needs from the host.
/// A trait so the lifecycle manager's tests can stub it out.
#[async_trait]
pub trait HostClient: Send + Sync {
    async fn list_streams(&self) -> HostResult<Vec<HostStream>>;
    async fn list_channels(&self) -> HostResult<Vec<HostChannel>>;
    async fn create_channel(&self, request: CreateChannelRequest) -> HostResult<String>;
    async fn delete_channel(&self, channel_id: &str) -> HostResult<()>;
    async fn set_channel_epg(&self, channel_id: &str, epg_source_id: &str) -> HostResult<()>;
}

/// HTTP implementation of [`HostClient`] against the host's REST
/// contract, authenticating with either a bearer token or HTTP basic
/// auth depending on what's configured.
pub struct HttpHostClient {
    client: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
}

impl HttpHostClient {
    pub fn new(config: &HostConfig) -> HostResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(HostError::Transport)?;
        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost".to_string()),
            username: config.username.clone(),
            password: config.password.clone(),
            token: config.token.clone(),
        })
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            builder.bearer_auth(token)
        } else if let Some(username) = &self.username {
            builder.basic_auth(username, self.password.clone())
        } else {
            builder
        }
    }

    async fn handle_response(response: reqwest::Response) -> HostResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(HostError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl HostClient for HttpHostClient {
    #[instrument(skip(self))]
    async fn list_streams(&self) -> HostResult<Vec<HostStream>> {
        let url = format!("{}/api/streams", self.base_url);
        let response = self.authed(self.client.get(&url)).send().await.map_err(HostError::Transport)?;
        let response = Self::handle_response(response).await?;
        response.json().await.map_err(HostError::Transport)
    }

    #[instrument(skip(self))]
    async fn list_channels(&self) -> HostResult<Vec<HostChannel>> {
        let url = format!("{}/api/channels", self.base_url);
        let response = self.authed(self.client.get(&url)).send().await.map_err(HostError::Transport)?;
        let response = Self::handle_response(response).await?;
        response.json().await.map_err(HostError::Transport)
    }

    #[instrument(skip(self, request))]
    async fn create_channel(&self, request: CreateChannelRequest) -> HostResult<String> {
        let url = format!("{}/api/channels", self.base_url);
        let response = self
            .authed(self.client.post(&url).json(&request))
            .send()
            .await
            .map_err(HostError::Transport)?;
        let response = Self::handle_response(response).await?;
        let body: CreateChannelResponse = response.json().await.map_err(HostError::Transport)?;
        Ok(body.id)
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel_id: &str) -> HostResult<()> {
        let url = format!("{}/api/channels/{}", self.base_url, channel_id);
        let response = self.authed(self.client.delete(&url)).send().await.map_err(HostError::Transport)?;
        match Self::handle_response(response).await {
            Ok(_) => Ok(()),
            Err(error) if error.is_not_found() => {
                warn!("host reported channel {} already gone, treating delete as success", channel_id);
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    #[instrument(skip(self))]
    async fn set_channel_epg(&self, channel_id: &str, epg_source_id: &str) -> HostResult<()> {
        let url = format!("{}/api/channels/{}/epg", self.base_url, channel_id);
        let response = self
            .authed(self.client.put(&url).json(&serde_json::json!({ "epg_source_id": epg_source_id })))
            .send()
            .await
            .map_err(HostError::Transport)?;
        Self::handle_response(response).await?;
        Ok(())
    }
}
