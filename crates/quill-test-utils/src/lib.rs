//! Testing utilities for the Quill workspace
//!
//! Shared test doubles and fixtures:
//! - [`MemoryGateway`]: in-memory story store with version checking,
//!   tombstones, fault injection, and per-operation call counters
//! - [`FixedIdentity`] / [`NoSession`]: identity providers for the
//!   signed-in and signed-out cases
//! - [`seed_story`] / [`tombstone`]: record fixture builders

#![allow(missing_docs)]

use chrono::Utc;
use parking_lot::Mutex;
use quill_gateway::{GatewayError, StoryGateway};
use quill_identity::{IdentityError, IdentityProvider};
use quill_model::{CreateStoryInput, RemoteStoryRecord, StoryColor, StoryId, UserId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Build a live (non-tombstoned) record fixture
pub fn seed_story(
    id: &str,
    title: &str,
    color: StoryColor,
    owner: &str,
    version: i64,
) -> RemoteStoryRecord {
    let now = Utc::now();
    RemoteStoryRecord {
        id: StoryId::from(id),
        title: title.to_string(),
        color,
        owner: UserId::from(owner),
        version,
        created_at: now,
        updated_at: now,
        deleted: None,
        last_changed_at: Some(now.timestamp_millis()),
    }
}

/// Turn a record fixture into a tombstone
#[must_use]
pub fn tombstone(mut record: RemoteStoryRecord) -> RemoteStoryRecord {
    record.deleted = Some(true);
    record.version += 1;
    record
}

#[derive(Default)]
struct MemoryState {
    records: Vec<RemoteStoryRecord>,
    next_id: u64,
}

/// In-memory story store
///
/// Behaves like the remote store at the gateway seam: sequential ids,
/// version 1 on create, version-checked deletes that leave tombstones
/// behind, and list responses that include those tombstones. Fault
/// flags turn individual operations into transport failures; call
/// counters let tests assert which operations actually ran.
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    fail_list: AtomicBool,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    fail_delete_ids: Mutex<HashSet<StoryId>>,
    mangle_titles: AtomicBool,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryGateway {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    #[must_use]
    pub fn with_records(records: Vec<RemoteStoryRecord>) -> Self {
        let gateway = Self::new();
        {
            let mut state = gateway.state.lock();
            state.next_id = records.len() as u64;
            state.records = records;
        }
        gateway
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Make deletes of one specific record fail while the rest succeed
    pub fn set_fail_delete_for(&self, id: StoryId) {
        self.fail_delete_ids.lock().insert(id);
    }

    /// Make creates persist a store-mutated title ("title (edited)")
    /// while still echoing a record back, to exercise the client's
    /// use-the-local-title rule
    pub fn set_mangle_titles(&self, mangle: bool) {
        self.mangle_titles.store(mangle, Ordering::SeqCst);
    }

    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of the store contents, tombstones included
    #[must_use]
    pub fn records(&self) -> Vec<RemoteStoryRecord> {
        self.state.lock().records.clone()
    }
}

#[async_trait::async_trait]
impl StoryGateway for MemoryGateway {
    async fn list(&self, owner: &UserId) -> Result<Vec<RemoteStoryRecord>, GatewayError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("injected list failure".to_string()));
        }
        let state = self.state.lock();
        Ok(state
            .records
            .iter()
            .filter(|r| &r.owner == owner)
            .cloned()
            .collect())
    }

    async fn create(&self, input: CreateStoryInput) -> Result<RemoteStoryRecord, GatewayError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport(
                "injected create failure".to_string(),
            ));
        }
        let mut state = self.state.lock();
        state.next_id += 1;
        let title = if self.mangle_titles.load(Ordering::SeqCst) {
            format!("{} (edited)", input.title)
        } else {
            input.title
        };
        let now = Utc::now();
        let record = RemoteStoryRecord {
            id: StoryId::from(format!("story-{}", state.next_id)),
            title,
            color: input.color,
            owner: input.owner,
            version: 1,
            created_at: now,
            updated_at: now,
            deleted: None,
            last_changed_at: Some(now.timestamp_millis()),
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &StoryId, version: i64) -> Result<(), GatewayError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) || self.fail_delete_ids.lock().contains(id) {
            return Err(GatewayError::Transport(
                "injected delete failure".to_string(),
            ));
        }
        let mut state = self.state.lock();
        let Some(record) = state.records.iter_mut().find(|r| &r.id == id) else {
            return Err(GatewayError::Rejected(format!("no such story: {id}")));
        };
        if record.version != version {
            return Err(GatewayError::Conflict {
                id: id.clone(),
                version,
            });
        }
        record.deleted = Some(true);
        record.version += 1;
        record.updated_at = Utc::now();
        Ok(())
    }
}

/// Identity provider that always reports the same signed-in user
pub struct FixedIdentity(pub UserId);

impl FixedIdentity {
    #[must_use]
    pub fn new(user: impl Into<String>) -> Self {
        Self(UserId::new(user))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FixedIdentity {
    async fn current_user_id(&self) -> Result<UserId, IdentityError> {
        Ok(self.0.clone())
    }
}

/// Identity provider with no session
pub struct NoSession;

#[async_trait::async_trait]
impl IdentityProvider for NoSession {
    async fn current_user_id(&self) -> Result<UserId, IdentityError> {
        Err(IdentityError::Unauthenticated)
    }
}
