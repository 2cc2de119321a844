//! The story reconciler.
//!
//! Owns the in-memory story list shown on the dashboard and reconciles
//! it against the remote store with remote-first/local-fallback
//! semantics: a failed create still yields a visible record, and a
//! confirmed delete always removes the record whether or not the store
//! cooperated. State lives behind a single mutex that is never held
//! across an await; every mutation happens as one atomic state update,
//! so concurrently resolving operations cannot interleave a
//! half-updated list.

use crate::error::SyncError;
use crate::title;
use crate::view::{DashboardSnapshot, DisplayId, LocalId, LocalStoryView, RecordRef};
use futures::future::join_all;
use parking_lot::Mutex;
use quill_gateway::StoryGateway;
use quill_identity::IdentityProvider;
use quill_model::{CreateStoryInput, StoryColor, UserId};
use std::sync::Arc;

/// Outcome of a `delete_all` sweep
///
/// Failures are absorbed (the list is cleared regardless) but counted,
/// so callers can log or display how much of the sweep actually
/// reached the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteAllReport {
    /// Remote deletes issued
    pub attempted: usize,
    /// Remote deletes that failed
    pub failed: usize,
}

struct DashboardState {
    items: Vec<LocalStoryView>,
    pending_delete: Option<DisplayId>,
    /// Number the next convention-generated title will use; never
    /// regresses within a session, even across deletions and failures
    next_story_number: u64,
    /// Next display id to allocate; monotonic between loads so a
    /// removal never frees an id for reuse
    next_display_id: u32,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pending_delete: None,
            next_story_number: 1,
            next_display_id: 1,
        }
    }
}

impl DashboardState {
    fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            items: self.items.clone(),
            pending_delete: self.pending_delete,
        }
    }

    fn allocate_display_id(&mut self) -> DisplayId {
        let id = DisplayId(self.next_display_id);
        self.next_display_id += 1;
        id
    }
}

/// Reconciles the dashboard's story list against the remote store
///
/// The presenter forwards user intents here and renders from
/// [`StoryReconciler::snapshot`]. Deletion is two-phase:
/// `request_delete` records intent for the confirmation prompt,
/// `confirm_delete`/`cancel_delete` resolve it.
pub struct StoryReconciler {
    gateway: Arc<dyn StoryGateway>,
    identity: Arc<dyn IdentityProvider>,
    state: Mutex<DashboardState>,
}

impl StoryReconciler {
    /// Create a reconciler with an empty story list
    #[must_use]
    pub fn new(gateway: Arc<dyn StoryGateway>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            gateway,
            identity,
            state: Mutex::new(DashboardState::default()),
        }
    }

    /// Resolve the signed-in user for story operations
    ///
    /// # Errors
    /// Propagates `Unauthenticated` untouched; story operations are
    /// never attempted with a placeholder id.
    pub async fn current_user_id(&self) -> Result<UserId, SyncError> {
        Ok(self.identity.current_user_id().await?)
    }

    /// Read-only copy of the current list and pending-delete intent
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().snapshot()
    }

    /// Replace the list with the authoritative remote state
    ///
    /// Maps each non-tombstoned record, in store order, to a view with
    /// display ids counted from 1, and seeds the title counter from
    /// the highest "New Story {n}" already present. Local-only records
    /// from earlier failed creates are discarded; a fresh load is
    /// authoritative.
    ///
    /// # Errors
    /// Surfaces the gateway failure after resetting to the empty
    /// state, so the dashboard renders an empty list instead of stale
    /// entries.
    pub async fn load(&self, owner: &UserId) -> Result<Vec<LocalStoryView>, SyncError> {
        let records = match self.gateway.list(owner).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(owner = %owner, error = %e, "loading stories failed");
                *self.state.lock() = DashboardState::default();
                return Err(e.into());
            }
        };

        let visible: Vec<_> = records.into_iter().filter(|r| !r.is_tombstone()).collect();
        let next_story_number = title::next_story_number(visible.iter().map(|r| r.title.as_str()));

        let mut items = Vec::with_capacity(visible.len());
        let mut next_display_id = 1u32;
        for record in visible {
            items.push(LocalStoryView {
                display_id: DisplayId(next_display_id),
                record: RecordRef::Remote {
                    id: record.id,
                    version: record.version,
                },
                title: record.title,
                color: record.color,
            });
            next_display_id += 1;
        }

        tracing::info!(
            owner = %owner,
            count = items.len(),
            next_story_number,
            "loaded stories"
        );

        let mut state = self.state.lock();
        *state = DashboardState {
            items: items.clone(),
            pending_delete: None,
            next_story_number,
            next_display_id,
        };
        Ok(items)
    }

    /// Create a story, falling back to a local-only record on failure
    ///
    /// The title number is reserved up front and consumed exactly once
    /// per call, so no outcome (success, failure, or a concurrent
    /// create resolving first) ever reuses a title within the session.
    /// The appended view always carries the locally computed title,
    /// even when the store echoes back something else.
    pub async fn create_story(&self, owner: &UserId) -> LocalStoryView {
        let number = {
            let mut state = self.state.lock();
            let n = state.next_story_number;
            state.next_story_number += 1;
            n
        };
        let story_title = title::new_story_title(number);
        let color = StoryColor::random();

        let record = match self
            .gateway
            .create(CreateStoryInput {
                title: story_title.clone(),
                color,
                owner: owner.clone(),
            })
            .await
        {
            Ok(remote) => {
                tracing::info!(story = %remote.id, title = %story_title, "created story");
                RecordRef::Remote {
                    id: remote.id,
                    version: remote.version,
                }
            }
            Err(e) => {
                let local_id = LocalId::new();
                tracing::warn!(
                    error = %e,
                    title = %story_title,
                    local = %local_id,
                    "remote create failed; keeping local-only story"
                );
                RecordRef::Local(local_id)
            }
        };

        let mut state = self.state.lock();
        let view = LocalStoryView {
            display_id: state.allocate_display_id(),
            record,
            title: story_title,
            color,
        };
        state.items.push(view.clone());
        view
    }

    /// Record delete intent for the confirmation prompt
    ///
    /// Single-slot: a second request before confirm/cancel overwrites
    /// the first. Performs no mutation. Returns false when no visible
    /// record has that display id.
    pub fn request_delete(&self, display_id: DisplayId) -> bool {
        let mut state = self.state.lock();
        if state.items.iter().any(|v| v.display_id == display_id) {
            state.pending_delete = Some(display_id);
            true
        } else {
            tracing::debug!(%display_id, "delete requested for unknown record");
            false
        }
    }

    /// Drop the pending delete intent without touching the list
    pub fn cancel_delete(&self) {
        self.state.lock().pending_delete = None;
    }

    /// Carry out the pending delete
    ///
    /// The record leaves the list the moment the user confirms;
    /// local-only records never reach the store, and a failed remote
    /// delete is logged rather than surfaced. Returns the removed view,
    /// or `None` when no intent was pending.
    pub async fn confirm_delete(&self) -> Option<LocalStoryView> {
        let removed = {
            let mut state = self.state.lock();
            let display_id = state.pending_delete.take()?;
            let position = state.items.iter().position(|v| v.display_id == display_id)?;
            state.items.remove(position)
        };

        match &removed.record {
            RecordRef::Local(local_id) => {
                tracing::info!(local = %local_id, title = %removed.title, "removed local-only story");
            }
            RecordRef::Remote { id, version } => {
                if let Err(e) = self.gateway.delete(id, *version).await {
                    tracing::warn!(
                        story = %id,
                        version,
                        error = %e,
                        "remote delete failed; record already removed locally"
                    );
                } else {
                    tracing::info!(story = %id, title = %removed.title, "deleted story");
                }
            }
        }
        Some(removed)
    }

    /// Delete every remote story and clear the list
    ///
    /// Re-fetches the authoritative remote list rather than trusting
    /// the in-memory one, fires one delete per record concurrently
    /// with that record's own version, and waits for all of them to
    /// settle. The list and counter reset regardless of individual
    /// failures.
    pub async fn delete_all(&self, owner: &UserId) -> DeleteAllReport {
        let records = match self.gateway.list(owner).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(owner = %owner, error = %e, "listing stories for delete-all failed");
                Vec::new()
            }
        };
        let targets: Vec<_> = records.into_iter().filter(|r| !r.is_tombstone()).collect();

        let attempted = targets.len();
        let results = join_all(
            targets
                .iter()
                .map(|record| self.gateway.delete(&record.id, record.version)),
        )
        .await;

        let mut failed = 0;
        for (record, result) in targets.iter().zip(&results) {
            if let Err(e) = result {
                failed += 1;
                tracing::warn!(story = %record.id, error = %e, "delete-all: remote delete failed");
            }
        }

        *self.state.lock() = DashboardState::default();
        tracing::info!(owner = %owner, attempted, failed, "delete-all finished");
        DeleteAllReport { attempted, failed }
    }
}
