//! Error types for update handling.

use ohmytime_protocol::ProtocolError;
use thiserror::Error;

/// Errors raised while handling a single update.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Index query failed.
    #[error("search failed: {0}")]
    Search(#[source] ProtocolError),
    /// Record id could not be resolved.
    #[error("fetch {id} failed: {source}")]
    Fetch {
        id: String,
        #[source]
        source: ProtocolError,
    },
    /// Timezone identifier is not a known zone name.
    #[error("invalid timezone: {0:?}")]
    InvalidTimezone(String),
    /// Reply delivery failed.
    #[error("send failed: {0}")]
    Send(#[source] ProtocolError),
    /// Worker pool cannot run without workers.
    #[error("worker count must be at least 1")]
    NoWorkers,
}

impl CoreError {
    /// Whether the user gets the generic failure reply; delivery failures are only logged.
    pub fn warrants_failure_reply(&self) -> bool {
        matches!(
            self,
            CoreError::Search(_) | CoreError::Fetch { .. } | CoreError::InvalidTimezone(_)
        )
    }
}
