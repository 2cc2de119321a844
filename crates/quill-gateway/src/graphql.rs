//! GraphQL operation documents and response envelope handling.
//!
//! The documents mirror the store's generated schema: stories carry the
//! sync-protocol metadata fields (`_version`, `_deleted`,
//! `_lastChangedAt`) alongside the user-visible ones, and list results
//! arrive as a paginated connection with `items` / `nextToken`.

use crate::error::GatewayError;
use quill_model::{RemoteStoryRecord, StoryId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub(crate) const LIST_STORIES: &str = r#"query ListStories(
  $filter: ModelStoryFilterInput
  $limit: Int
  $nextToken: String
) {
  listStories(filter: $filter, limit: $limit, nextToken: $nextToken) {
    items {
      id
      title
      color
      userId
      createdAt
      updatedAt
      _version
      _deleted
      _lastChangedAt
    }
    nextToken
  }
}"#;

pub(crate) const CREATE_STORY: &str = r#"mutation CreateStory($input: CreateStoryInput!) {
  createStory(input: $input) {
    id
    title
    color
    userId
    createdAt
    updatedAt
    _version
    _deleted
    _lastChangedAt
  }
}"#;

pub(crate) const DELETE_STORY: &str = r#"mutation DeleteStory($input: DeleteStoryInput!) {
  deleteStory(input: $input) {
    id
    _version
    _deleted
  }
}"#;

/// Outgoing request body
#[derive(Debug, serde::Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub(crate) query: &'a str,
    pub(crate) variables: Value,
}

/// Response envelope: `data` plus an optional `errors` array
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,
    #[serde(default)]
    pub(crate) errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorEntry {
    pub(crate) message: String,
    #[serde(rename = "errorType", default)]
    pub(crate) error_type: Option<String>,
}

impl GraphQlErrorEntry {
    /// Whether the store rejected a mutation for a stale version
    ///
    /// AppSync-style stores tag these either with the sync-conflict
    /// error type or with the underlying conditional-write failure.
    fn is_version_conflict(&self) -> bool {
        match self.error_type.as_deref() {
            Some("ConflictUnhandled") | Some("ConditionalCheckFailedException") => true,
            _ => self
                .message
                .to_ascii_lowercase()
                .contains("conditional request failed"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListStoriesData {
    #[serde(rename = "listStories")]
    pub(crate) list_stories: StoryConnection,
}

/// Paginated list result; the store may interleave `null` items
#[derive(Debug, Deserialize)]
pub(crate) struct StoryConnection {
    #[serde(default)]
    pub(crate) items: Vec<Option<RemoteStoryRecord>>,
    #[serde(rename = "nextToken", default)]
    pub(crate) next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateStoryData {
    #[serde(rename = "createStory")]
    pub(crate) create_story: RemoteStoryRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteStoryData {
    #[serde(rename = "deleteStory", default)]
    pub(crate) delete_story: Option<Value>,
}

/// Decode a raw response body into the typed envelope
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    body: &[u8],
) -> Result<GraphQlResponse<T>, GatewayError> {
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::Transport(format!("malformed store response: {e}")))
}

/// Extract `data` from an envelope, mapping store errors to the taxonomy
///
/// `conflict_target` names the record a mutation addressed so stale
/// version rejections can carry the id and submitted version.
pub(crate) fn unwrap_data<T>(
    response: GraphQlResponse<T>,
    conflict_target: Option<(&StoryId, i64)>,
) -> Result<T, GatewayError> {
    if let Some(entry) = response.errors.first() {
        if entry.is_version_conflict() {
            if let Some((id, version)) = conflict_target {
                return Err(GatewayError::Conflict {
                    id: id.clone(),
                    version,
                });
            }
        }
        return Err(GatewayError::Rejected(entry.message.clone()));
    }
    response
        .data
        .ok_or_else(|| GatewayError::Transport("store response carried no data".to_string()))
}
