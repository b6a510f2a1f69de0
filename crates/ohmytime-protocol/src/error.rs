/// Errors returned by senders and location indexes.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Index could not run the query.
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),
    /// Record id does not resolve in the index.
    #[error("record not found: {0}")]
    RecordNotFound(String),
    /// Reply or acknowledgement could not be delivered.
    #[error("delivery failed: {0}")]
    Delivery(String),
}
