//! Story records as the remote store represents them.

use crate::color::StoryColor;
use crate::ids::{StoryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A story record owned by the remote store
///
/// The store assigns `id`, timestamps, and `version` (starting at 1,
/// bumped on every successful mutation). `version` is the optimistic
/// concurrency token: mutations must resend the last observed value or
/// the store rejects them. `deleted` is the sync-protocol tombstone;
/// list responses may contain tombstoned records and clients exclude
/// them from any visible set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteStoryRecord {
    pub id: StoryId,
    pub title: String,
    pub color: StoryColor,
    #[serde(rename = "userId")]
    pub owner: UserId,
    #[serde(rename = "_version")]
    pub version: i64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    /// Tombstone marker; the wire reports `true`, `false`, `null`, or
    /// omits the field entirely
    #[serde(rename = "_deleted", default)]
    pub deleted: Option<bool>,
    /// Store-side change clock (epoch millis)
    #[serde(rename = "_lastChangedAt", default)]
    pub last_changed_at: Option<i64>,
}

impl RemoteStoryRecord {
    /// Whether the store has soft-deleted this record
    #[inline]
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.deleted.unwrap_or(false)
    }
}

/// Fields a client supplies when creating a story
///
/// The store fills in everything else (id, version = 1, timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStoryInput {
    pub title: String,
    pub color: StoryColor,
    #[serde(rename = "userId")]
    pub owner: UserId,
}
