//! Telegram Bot API adapter for ohmytime.
//!
//! Provides a [`TelegramClient`] implementing the `Sender` contract and an
//! [`UpdatePoller`] that long-polls `getUpdates` and feeds converted updates
//! into the dispatcher channel.

mod client;
mod error;
mod poller;
pub mod wire;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use poller::UpdatePoller;
