//! Quill Sync - optimistic story synchronization
//!
//! The core of the client: reconciles the dashboard's in-memory story
//! list against the remote store and keeps the UI responsive when the
//! store is not:
//! - [`StoryReconciler`]: owns the list, the "New Story {n}" counter,
//!   and the two-phase delete intent
//! - [`LocalStoryView`] / [`RecordRef`]: the view model, with remote
//!   and local-only identity as an explicit tagged variant
//! - [`DashboardSnapshot`]: the read-only state the presenter renders
//!
//! Failure policy is deliberately asymmetric: `load` surfaces its
//! error (empty list, not a crash), `create_story` silently falls back
//! to a local-only record, and deletes always take effect locally no
//! matter what the store says.
//!
//! # Example
//!
//! ```rust,ignore
//! use quill_sync::StoryReconciler;
//!
//! # async fn example(reconciler: StoryReconciler) -> Result<(), quill_sync::SyncError> {
//! let user = reconciler.current_user_id().await?;
//! reconciler.load(&user).await?;
//!
//! let story = reconciler.create_story(&user).await;
//! println!("created {}", story.title);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod reconciler;
pub mod title;
pub mod view;

pub use error::SyncError;
pub use reconciler::{DeleteAllReport, StoryReconciler};
pub use view::{DashboardSnapshot, DisplayId, LocalId, LocalStoryView, RecordRef};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Quill Sync
    pub use crate::{
        DashboardSnapshot, DeleteAllReport, DisplayId, LocalStoryView, RecordRef, StoryReconciler,
        SyncError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
