use crate::{LocationRecord, ProtocolError, RecordId};
use async_trait::async_trait;

/// Read-only search contract over indexed location records.
///
/// Implementations must be safe for concurrent reads from every worker.
#[async_trait]
pub trait LocationIndex: Send + Sync {
    /// Return record ids matching the query, best match first.
    async fn search(&self, query: &str) -> Result<Vec<RecordId>, ProtocolError>;

    /// Fetch a record by id.
    async fn fetch(&self, id: &str) -> Result<LocationRecord, ProtocolError>;
}
