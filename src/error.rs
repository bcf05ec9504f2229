use thiserror::Error;

use crate::branch::Branch;
use crate::feed::FeedKind;

/// Failures on the synchronization path. Every variant is scoped to a single
/// branch: the engine recovers locally and the other branches keep flowing.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("feed for branch {branch} was never initialized")]
    AdapterUninitialized { branch: Branch },

    #[error("subscription stream {kind} for branch {branch} failed: {message}")]
    Subscription {
        branch: Branch,
        kind: FeedKind,
        message: String,
    },

    #[error("one-shot {kind} fetch for branch {branch} failed: {message}")]
    Fetch {
        branch: Branch,
        kind: FeedKind,
        message: String,
    },

    #[error("target configuration for branch {branch} has no usable payload")]
    MalformedConfig { branch: Branch },
}

impl SyncError {
    /// Wrap an adapter-level failure of a one-shot fetch.
    pub fn fetch(branch: Branch, kind: FeedKind, err: impl std::fmt::Display) -> Self {
        SyncError::Fetch {
            branch,
            kind,
            message: err.to_string(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
