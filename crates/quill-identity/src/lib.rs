//! Quill Identity Context
//!
//! Resolves the current user against the hosted identity provider.
//! Story operations are all scoped to a [`quill_model::UserId`]; this
//! crate is the single place that answers "who is signed in":
//! - [`IdentityProvider`]: the trait the sync layer programs against
//! - [`HttpIdentityProvider`]: session lookup against the provider's
//!   current-session endpoint
//! - [`IdentityError`]: `Unauthenticated` (no session) is distinct from
//!   transport failures and always propagates to the caller; there is
//!   no placeholder user
//!
//! Sign-up, sign-in, verification, and OAuth redirects are the hosted
//! provider's own flows and out of scope here.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod http;

pub use http::{HttpIdentityProvider, IdentityConfig};

use quill_model::UserId;

/// Failure resolving the current user
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No current session
    #[error("user not authenticated")]
    Unauthenticated,

    /// Network or provider failure
    #[error("identity transport failure: {0}")]
    Transport(String),
}

impl IdentityError {
    /// Whether there is simply no signed-in user
    #[inline]
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Current-session lookup
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the signed-in user's identifier
    ///
    /// # Errors
    /// `IdentityError::Unauthenticated` when no session exists.
    async fn current_user_id(&self) -> Result<UserId, IdentityError>;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
