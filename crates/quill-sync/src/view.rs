//! In-session view model for the dashboard's story list.
//!
//! These types are owned exclusively by the reconciler and never
//! persisted; a reload rebuilds them from the remote store.

use quill_model::{StoryColor, StoryId};
use ulid::Ulid;

/// Session-local list key
///
/// Small integer handed to the presenter as a stable correlation
/// handle, independent of the store-assigned id. Unique within the
/// current list and stable for the life of the record; a fresh load
/// renumbers from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayId(pub u32);

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity for a record that never completed a remote round-trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalId(pub Ulid);

impl LocalId {
    /// Generate a fresh local-only identity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local-{}", self.0)
    }
}

/// What a view entry mirrors: a remote record or nothing at all
///
/// `Remote` carries the last observed store version alongside the id,
/// so every delete submits exactly the version the client saw. `Local`
/// records exist only because a remote create failed; they have no
/// version and must never be submitted to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Remote { id: StoryId, version: i64 },
    Local(LocalId),
}

impl RecordRef {
    /// Whether this entry has no remote counterpart
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// The remote id, when one exists
    #[inline]
    #[must_use]
    pub fn remote_id(&self) -> Option<&StoryId> {
        match self {
            Self::Remote { id, .. } => Some(id),
            Self::Local(_) => None,
        }
    }
}

/// One entry in the dashboard's story list
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStoryView {
    pub display_id: DisplayId,
    pub record: RecordRef,
    pub title: String,
    pub color: StoryColor,
}

/// Read-only state handed to the presenter for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    /// Visible stories in display order
    pub items: Vec<LocalStoryView>,
    /// The record awaiting delete confirmation, if any
    pub pending_delete: Option<DisplayId>,
}

impl DashboardSnapshot {
    /// Number of visible stories
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
