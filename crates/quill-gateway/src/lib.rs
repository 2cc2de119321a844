//! Quill Story Gateway
//!
//! Thin typed wrapper around the remote story store. Translates
//! list/create/delete intents into the store's GraphQL operations and
//! maps store responses back into [`quill_model`] types:
//! - [`StoryGateway`]: the trait the sync layer programs against
//! - [`HttpStoryGateway`]: the production implementation (GraphQL over
//!   HTTP via `reqwest`)
//! - [`GatewayError`]: distinguishes transport failures from
//!   store-side rejections, with version conflicts kept as their own tag
//!
//! The gateway reports the store verbatim: list responses include
//! tombstoned records, and callers decide what is visible.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod graphql;
mod http;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpStoryGateway;

use quill_model::{CreateStoryInput, RemoteStoryRecord, StoryId, UserId};

/// Remote story store operations
///
/// Every mutation carries the last observed `version` so the store can
/// reject stale writes (optimistic concurrency).
#[async_trait::async_trait]
pub trait StoryGateway: Send + Sync {
    /// List all story records owned by `owner`, tombstones included
    async fn list(&self, owner: &UserId) -> Result<Vec<RemoteStoryRecord>, GatewayError>;

    /// Create a story; the store assigns id, version 1, and timestamps
    async fn create(&self, input: CreateStoryInput) -> Result<RemoteStoryRecord, GatewayError>;

    /// Delete a story, submitting the last observed version
    ///
    /// # Errors
    /// `GatewayError::Conflict` when the store holds a newer version
    /// than the one submitted.
    async fn delete(&self, id: &StoryId, version: i64) -> Result<(), GatewayError>;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
