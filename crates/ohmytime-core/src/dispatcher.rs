//! Worker pool that drains the update stream.
//!
//! Every worker claims the next update from one shared receiver, so each
//! update is handled by exactly one worker. Ordering across workers is not
//! preserved. Cancellation stops claiming; handlers already running finish
//! before [`Dispatcher::run`] returns.

use crate::clock::local_time;
use crate::error::CoreError;
use crate::reply::{
    GENERIC_FAILURE_TEXT, NOTHING_FOUND_TEXT, location_label, pick_location_text, time_reply,
    welcome_text,
};
use crate::resolver::{Outcome, Resolver};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use ohmytime_protocol::{
    BuildInfo, ChatId, LocationIndex, LocationRecord, OutgoingMessage, START_COMMAND, Sender,
    Update, UpdateKind,
};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

/// Source of the current instant used for time replies.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Routes updates to the command, text and selection handlers.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: Resolver,
    sender: Arc<dyn Sender>,
    welcome: Arc<str>,
    clock: Clock,
}

impl Dispatcher {
    pub fn new(index: Arc<dyn LocationIndex>, sender: Arc<dyn Sender>, build: &BuildInfo) -> Self {
        Self {
            resolver: Resolver::new(index),
            sender,
            welcome: welcome_text(build).into(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used for time replies.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run `worker_count` workers until the stream closes or `cancel` fires.
    ///
    /// Returns once every worker has exited.
    pub async fn run(
        &self,
        updates: mpsc::Receiver<Update>,
        worker_count: usize,
        cancel: CancellationToken,
    ) -> Result<(), CoreError> {
        if worker_count == 0 {
            return Err(CoreError::NoWorkers);
        }
        info!("dispatcher starting (workers={})", worker_count);
        let updates = Arc::new(Mutex::new(updates));
        let workers: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let dispatcher = self.clone();
                let updates = updates.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move { dispatcher.work(worker_id, updates, cancel).await })
            })
            .collect();

        for handle in workers {
            if let Err(err) = handle.await {
                error!("dispatcher worker terminated abnormally: {}", err);
            }
        }
        info!("dispatcher stopped");
        Ok(())
    }

    async fn work(
        &self,
        worker_id: usize,
        updates: Arc<Mutex<mpsc::Receiver<Update>>>,
        cancel: CancellationToken,
    ) {
        debug!("dispatcher worker started (worker_id={})", worker_id);
        loop {
            let next = {
                let mut receiver = updates.lock().await;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    update = receiver.recv() => update,
                }
            };
            let Some(update) = next else {
                break;
            };
            self.handle_update(update).await;
        }
        debug!("dispatcher worker stopped (worker_id={})", worker_id);
    }

    /// Handle one update; errors are logged and never escape.
    pub async fn handle_update(&self, update: Update) {
        let Update {
            update_id,
            chat_id,
            kind,
        } = update;
        let result = match kind {
            UpdateKind::Command { name, .. } => self.handle_command(chat_id, &name).await,
            UpdateKind::PlainMessage { text } => self.handle_message(chat_id, &text).await,
            UpdateKind::CallbackSelection { callback_id, token } => {
                self.handle_selection(chat_id, &callback_id, &token).await
            }
        };
        if let Err(err) = result {
            error!(
                "handle update failed (update_id={}, chat_id={}): {}",
                update_id, chat_id, err
            );
        }
    }

    async fn handle_command(&self, chat_id: ChatId, name: &str) -> Result<(), CoreError> {
        if name != START_COMMAND {
            debug!("ignoring command (chat_id={}, command={})", chat_id, name);
            return Ok(());
        }
        self.deliver(chat_id, OutgoingMessage::markdown(self.welcome.as_ref()))
            .await
    }

    async fn handle_message(&self, chat_id: ChatId, text: &str) -> Result<(), CoreError> {
        match self.resolver.resolve(text).await {
            Ok(Outcome::NoMatch) => {
                self.deliver(chat_id, OutgoingMessage::text(NOTHING_FOUND_TEXT))
                    .await
            }
            Ok(Outcome::Direct(record)) => self.send_time(chat_id, &record).await,
            Ok(Outcome::Ambiguous(rows)) => {
                debug!(
                    "sending candidate list (chat_id={}, rows={})",
                    chat_id,
                    rows.len()
                );
                let message = OutgoingMessage::text(pick_location_text()).with_options(rows);
                self.deliver(chat_id, message).await
            }
            Err(err) => self.fail(chat_id, err).await,
        }
    }

    async fn handle_selection(
        &self,
        chat_id: ChatId,
        callback_id: &str,
        token: &str,
    ) -> Result<(), CoreError> {
        if let Err(err) = self.sender.acknowledge(callback_id, token).await {
            warn!(
                "acknowledge callback failed (callback_id={}): {}",
                callback_id, err
            );
        }
        match self.resolver.fetch(token).await {
            Ok(record) => self.send_time(chat_id, &record).await,
            Err(err) => self.fail(chat_id, err).await,
        }
    }

    async fn send_time(&self, chat_id: ChatId, record: &LocationRecord) -> Result<(), CoreError> {
        let local = match local_time(&record.timezone, (self.clock)()) {
            Ok(local) => local,
            Err(err) => return self.fail(chat_id, err).await,
        };
        let text = time_reply(&location_label(record), &local);
        self.deliver(chat_id, OutgoingMessage::markdown(text)).await
    }

    /// Tell the user handling failed when the error warrants it, then return the error.
    async fn fail(&self, chat_id: ChatId, err: CoreError) -> Result<(), CoreError> {
        if err.warrants_failure_reply() {
            if let Err(send_err) = self
                .deliver(chat_id, OutgoingMessage::text(GENERIC_FAILURE_TEXT))
                .await
            {
                warn!(
                    "failure reply not delivered (chat_id={}): {}",
                    chat_id, send_err
                );
            }
        }
        Err(err)
    }

    async fn deliver(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<(), CoreError> {
        self.sender
            .send(chat_id, message)
            .await
            .map_err(CoreError::Send)
    }
}
