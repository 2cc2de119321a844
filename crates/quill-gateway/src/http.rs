//! HTTP implementation of the story gateway.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::graphql::{
    decode_envelope, unwrap_data, CreateStoryData, DeleteStoryData, GraphQlRequest,
    GraphQlResponse, ListStoriesData, CREATE_STORY, DELETE_STORY, LIST_STORIES,
};
use crate::StoryGateway;
use quill_model::{CreateStoryInput, RemoteStoryRecord, StoryId, UserId};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

/// Production gateway speaking GraphQL over HTTP
///
/// Owns a pooled [`reqwest::Client`]; cheap to clone-by-`Arc` at the
/// caller. All operations POST `{query, variables}` to the configured
/// endpoint and decode the standard `{data, errors}` envelope.
#[derive(Debug)]
pub struct HttpStoryGateway {
    config: GatewayConfig,
    client: reqwest::Client,
}

impl HttpStoryGateway {
    /// Build a gateway from configuration
    ///
    /// # Errors
    /// `GatewayError::Transport` if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &'static str,
        variables: Value,
    ) -> Result<GraphQlResponse<T>, GatewayError> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&GraphQlRequest { query, variables });
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(GatewayError::Transport(format!("store returned {status}")));
        }
        if status.is_client_error() {
            return Err(GatewayError::Rejected(format!("store returned {status}")));
        }

        let body = response.bytes().await?;
        decode_envelope(&body)
    }
}

#[async_trait::async_trait]
impl StoryGateway for HttpStoryGateway {
    async fn list(&self, owner: &UserId) -> Result<Vec<RemoteStoryRecord>, GatewayError> {
        let mut records = Vec::new();
        let mut next_token: Option<String> = None;

        // Follow the connection's nextToken until the store is drained.
        loop {
            let variables = json!({
                "filter": {"userId": {"eq": owner.as_str()}},
                "limit": self.config.list_page_size,
                "nextToken": next_token,
            });
            let envelope = self.execute::<ListStoriesData>(LIST_STORIES, variables).await?;
            let connection = unwrap_data(envelope, None)?.list_stories;

            records.extend(connection.items.into_iter().flatten());
            next_token = connection.next_token;
            if next_token.is_none() {
                break;
            }
        }

        tracing::debug!(owner = %owner, count = records.len(), "listed stories");
        Ok(records)
    }

    async fn create(&self, input: CreateStoryInput) -> Result<RemoteStoryRecord, GatewayError> {
        let variables = json!({"input": input});
        let envelope = self.execute::<CreateStoryData>(CREATE_STORY, variables).await?;
        let record = unwrap_data(envelope, None)?.create_story;
        tracing::debug!(story = %record.id, version = record.version, "created story");
        Ok(record)
    }

    async fn delete(&self, id: &StoryId, version: i64) -> Result<(), GatewayError> {
        let variables = json!({"input": {"id": id.as_str(), "_version": version}});
        let envelope = self.execute::<DeleteStoryData>(DELETE_STORY, variables).await?;
        let data = unwrap_data(envelope, Some((id, version)))?;
        if data.delete_story.is_none() {
            tracing::debug!(story = %id, "store acknowledged delete without a payload");
        }
        tracing::debug!(story = %id, version, "deleted story");
        Ok(())
    }
}
