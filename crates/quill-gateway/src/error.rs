//! Gateway error taxonomy.
//!
//! The sync layer currently treats every gateway failure the same way
//! (fallback or log-and-continue), but the tags stay distinct so
//! retryable transport failures can later be separated from store-side
//! rejections.

use quill_model::StoryId;

/// Failure reaching or being rejected by the remote store
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Network, timeout, or malformed-response failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// The store rejected a mutation because the submitted version is stale
    #[error("version conflict on story {id} (submitted version {version})")]
    Conflict { id: StoryId, version: i64 },

    /// Any other store-side rejection
    #[error("rejected by store: {0}")]
    Rejected(String),
}

impl GatewayError {
    /// Whether this is a stale-version rejection
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Whether the failure happened in transit rather than in the store
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
