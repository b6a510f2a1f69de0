use async_trait::async_trait;
use ohmytime_protocol::{ChatId, OutgoingMessage, ProtocolError, Sender};
use parking_lot::Mutex;

/// Message captured by [`RecordingSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message: OutgoingMessage,
}

/// Sender that records every message and acknowledgement.
#[derive(Default)]
pub struct RecordingSender {
    messages: Mutex<Vec<SentMessage>>,
    acknowledgements: Mutex<Vec<(String, String)>>,
    fail_acknowledge: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record acknowledgements but report them as failed.
    pub fn failing_acknowledge() -> Self {
        Self {
            fail_acknowledge: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.messages.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .map(|sent| sent.message.text.clone())
            .collect()
    }

    pub fn acknowledgements(&self) -> Vec<(String, String)> {
        self.acknowledgements.lock().clone()
    }
}

#[async_trait]
impl Sender for RecordingSender {
    async fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<(), ProtocolError> {
        self.messages.lock().push(SentMessage { chat_id, message });
        Ok(())
    }

    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<(), ProtocolError> {
        self.acknowledgements
            .lock()
            .push((callback_id.to_string(), text.to_string()));
        if self.fail_acknowledge {
            return Err(ProtocolError::Delivery("stub acknowledge failure".to_string()));
        }
        Ok(())
    }
}

/// Sender whose every call fails; counts attempts.
#[derive(Default)]
pub struct FailingSender {
    attempts: Mutex<usize>,
}

impl FailingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl Sender for FailingSender {
    async fn send(&self, _chat_id: ChatId, _message: OutgoingMessage) -> Result<(), ProtocolError> {
        *self.attempts.lock() += 1;
        Err(ProtocolError::Delivery("stub send failure".to_string()))
    }

    async fn acknowledge(&self, _callback_id: &str, _text: &str) -> Result<(), ProtocolError> {
        *self.attempts.lock() += 1;
        Err(ProtocolError::Delivery("stub acknowledge failure".to_string()))
    }
}
