//! Quill Data Model
//!
//! Shared types for the story synchronization client:
//! - [`RemoteStoryRecord`]: a story as the remote store reports it,
//!   including the optimistic-concurrency version and tombstone marker
//! - [`CreateStoryInput`]: the fields a client supplies on creation
//! - [`StoryId`] / [`UserId`]: opaque store-assigned identifiers
//! - [`StoryColor`]: the fixed cosmetic palette
//!
//! This crate performs no I/O; the wire mapping (field renames to the
//! store's `userId` / `_version` / `_deleted` convention) lives here so
//! every consumer decodes records the same way.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod color;
mod ids;
mod record;

pub use color::StoryColor;
pub use ids::{StoryId, UserId};
pub use record::{CreateStoryInput, RemoteStoryRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
