//! Long-polling update source.

use crate::client::TelegramClient;
use log::{debug, info, warn};
use ohmytime_protocol::Update;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Pause after a failed `getUpdates` call.
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Pulls updates from the Bot API into the dispatcher channel.
pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    timeout_secs: u64,
    backoff: Duration,
}

impl UpdatePoller {
    pub fn new(client: Arc<TelegramClient>, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Override the pause after failed polls.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Answer a callback query that carries no usable selection so the client stops waiting.
    async fn dismiss(&self, callback_id: &str) {
        debug!("dismissing unusable callback (callback_id={})", callback_id);
        if let Err(err) = self.client.answer_callback_query(callback_id, "").await {
            warn!(
                "dismiss callback failed (callback_id={}): {}",
                callback_id, err
            );
        }
    }

    /// Poll until cancelled or the receiving side is gone.
    ///
    /// Dropping `updates` on return closes the channel, which lets the
    /// dispatcher workers drain and exit.
    pub async fn run(self, updates: mpsc::Sender<Update>, cancel: CancellationToken) {
        info!("update poller started (timeout_secs={})", self.timeout_secs);
        let mut offset = 0i64;
        'poll: loop {
            let batch = tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'poll,
                batch = self.client.get_updates(offset, self.timeout_secs) => batch,
            };
            let batch = match batch {
                Ok(batch) => batch,
                Err(err) => {
                    warn!("get updates failed (offset={}): {}", offset, err);
                    tokio::select! {
                        _ = cancel.cancelled() => break 'poll,
                        _ = tokio::time::sleep(self.backoff) => continue 'poll,
                    }
                }
            };
            debug!("received updates (count={}, offset={})", batch.len(), offset);
            for raw in batch {
                offset = offset.max(raw.update_id + 1);
                let callback_id = raw.callback_query.as_ref().map(|query| query.id.clone());
                let Some(update) = raw.into_update() else {
                    if let Some(callback_id) = callback_id {
                        self.dismiss(&callback_id).await;
                    }
                    continue;
                };
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break 'poll,
                    sent = updates.send(update) => {
                        if sent.is_err() {
                            info!("update channel closed; stopping poller");
                            break 'poll;
                        }
                    }
                }
            }
        }
        info!("update poller stopped (offset={})", offset);
    }
}
