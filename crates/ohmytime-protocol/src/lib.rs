//! Shared types for ohmytime updates, replies and location records.
//!
//! This crate also owns the narrow contracts the dispatcher depends on: the
//! [`Sender`] used to deliver replies and the [`LocationIndex`] used to search
//! and fetch location records.

mod error;
mod index;
mod sender;

pub use error::ProtocolError;
pub use index::LocationIndex;
pub use sender::Sender;

use serde::{Deserialize, Serialize};

/// Identifier of the chat an update originates from.
pub type ChatId = i64;
/// Opaque identifier of an indexed location record.
pub type RecordId = String;

/// Command name that triggers the welcome reply.
pub const START_COMMAND: &str = "start";

/// One inbound event taken from the update stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Transport sequence number of the update.
    pub update_id: i64,
    /// Chat the reply must go to.
    pub chat_id: ChatId,
    /// Update payload.
    pub kind: UpdateKind,
}

/// Payload variants carried by an [`Update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// Free-text message that should be searched.
    PlainMessage { text: String },
    /// Slash command, `name` is stored without the leading slash.
    Command { name: String, text: String },
    /// Selection of an interactive option from a candidate list.
    CallbackSelection { callback_id: String, token: String },
}

impl Update {
    /// Build a free-text message update.
    pub fn plain(update_id: i64, chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            update_id,
            chat_id,
            kind: UpdateKind::PlainMessage { text: text.into() },
        }
    }

    /// Build a command update.
    pub fn command(
        update_id: i64,
        chat_id: ChatId,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            update_id,
            chat_id,
            kind: UpdateKind::Command {
                name: name.into(),
                text: text.into(),
            },
        }
    }

    /// Build a callback selection update.
    pub fn selection(
        update_id: i64,
        chat_id: ChatId,
        callback_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            update_id,
            chat_id,
            kind: UpdateKind::CallbackSelection {
                callback_id: callback_id.into(),
                token: token.into(),
            },
        }
    }
}

/// Indexed location entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Record id, also used as correlation token.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Region or alternate-name text.
    pub body: String,
    /// IANA timezone identifier.
    pub timezone: String,
    /// Language tag.
    pub lang: String,
}

/// Selectable option attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineOption {
    /// Text shown on the option.
    pub label: String,
    /// Correlation token echoed back when the option is selected.
    pub token: String,
}

impl InlineOption {
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Text formatting applied by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Plain,
    Markdown,
}

/// Reply handed to a [`Sender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// Message body.
    pub text: String,
    /// Formatting mode for the body.
    pub parse_mode: ParseMode,
    /// Optional rows of selectable options.
    pub options: Option<Vec<Vec<InlineOption>>>,
}

impl OutgoingMessage {
    /// Plain text reply without options.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Plain,
            options: None,
        }
    }

    /// Markdown formatted reply without options.
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: ParseMode::Markdown,
            options: None,
        }
    }

    /// Attach rows of selectable options.
    pub fn with_options(mut self, rows: Vec<Vec<InlineOption>>) -> Self {
        self.options = Some(rows);
        self
    }
}

/// Immutable build metadata passed to the components that render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Binary name.
    pub name: String,
    /// Release tag.
    pub tag: String,
    /// Build timestamp, empty when unknown.
    pub time: String,
    /// Public link to the bot.
    pub bot_url: String,
    /// Link to the project source.
    pub source_url: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            name: "ohmytime-bot".to_string(),
            tag: "v0.0.0".to_string(),
            time: String::new(),
            bot_url: "https://t.me/ohmytimebot".to_string(),
            source_url: "https://github.com/robotomize/ohmytime-bot".to_string(),
        }
    }
}
