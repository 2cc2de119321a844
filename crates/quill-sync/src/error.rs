//! Sync-layer error type.
//!
//! Only two operations can fail from the caller's perspective:
//! resolving the current user and the authoritative `load`. Create and
//! delete failures are absorbed by design (local fallback / removal
//! regardless) and never reach this type.

use quill_gateway::GatewayError;
use quill_identity::IdentityError;

/// Failure surfaced to the presenter
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No signed-in user, or the identity provider was unreachable
    #[error("identity failure: {0}")]
    Identity(#[from] IdentityError),

    /// The remote store could not be read
    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),
}

impl SyncError {
    /// Whether the root cause is a missing session
    #[inline]
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Identity(IdentityError::Unauthenticated))
    }
}
