use crate::{ChatId, OutgoingMessage, ProtocolError};
use async_trait::async_trait;

/// Delivery contract for replies and callback acknowledgements.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Deliver a message to a chat.
    async fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<(), ProtocolError>;

    /// Acknowledge an interactive selection so the client clears its loading state.
    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<(), ProtocolError>;
}
