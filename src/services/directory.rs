use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::Actor;

/// Errors that can occur when resolving actors via the profile directory
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("actor {0} not found")]
    NotFound(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("directory returned error: {0}")]
    ApiError(String),

    #[error("unauthorized: invalid API key")]
    Unauthorized,

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Capability for resolving immutable actor snapshots.
///
/// The engine never mutates profile data; any backing store can sit behind
/// this trait without changing the engine.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn get_actor(&self, actor_id: &str) -> Result<Actor, ProviderError>;
}

/// HTTP client for the Yonder profile directory service
///
/// Fetches actor snapshots (skills, industries, location, availability,
/// contact details) for scoring and disclosure projection.
pub struct DirectoryClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl DirectoryClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl ProfileProvider for DirectoryClient {
    async fn get_actor(&self, actor_id: &str) -> Result<Actor, ProviderError> {
        let url = format!(
            "{}/v1/actors/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(actor_id)
        );

        tracing::debug!("Fetching actor from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Yonder-Key", &self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::NotFound(actor_id.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ProviderError::Unauthorized)
            }
            status if !status.is_success() => {
                return Err(ProviderError::ApiError(format!(
                    "failed to fetch actor {}: {}",
                    actor_id, status
                )));
            }
            _ => {}
        }

        let json: Value = response.json().await?;

        // The directory wraps the actor in a top-level "actor" object;
        // tolerate a bare payload as well.
        let payload = json.get("actor").unwrap_or(&json);

        serde_json::from_value(payload.clone())
            .map_err(|e| ProviderError::InvalidResponse(format!("failed to parse actor: {}", e)))
    }
}
