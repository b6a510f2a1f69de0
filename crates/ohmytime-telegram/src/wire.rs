//! Bot API request and response payloads.

use ohmytime_protocol::{InlineOption, OutgoingMessage, ParseMode, Update, UpdateKind};
use serde::{Deserialize, Serialize};

/// Entity type marking a slash command.
const BOT_COMMAND: &str = "bot_command";

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUpdate {
    pub update_id: i64,
    pub message: Option<RawMessage>,
    pub callback_query: Option<RawCallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMessage {
    pub message_id: i64,
    pub chat: RawChat,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<RawEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCallbackQuery {
    pub id: String,
    pub data: Option<String>,
    pub message: Option<RawMessage>,
}

impl RawUpdate {
    /// Convert into a dispatcher update; updates the bot does not handle map to `None`.
    pub fn into_update(self) -> Option<Update> {
        let update_id = self.update_id;
        if let Some(message) = self.message {
            let chat_id = message.chat.id;
            let kind = message.into_kind()?;
            return Some(Update {
                update_id,
                chat_id,
                kind,
            });
        }
        let query = self.callback_query?;
        let chat_id = query.message.as_ref()?.chat.id;
        Some(Update {
            update_id,
            chat_id,
            kind: UpdateKind::CallbackSelection {
                callback_id: query.id,
                token: query.data?,
            },
        })
    }
}

impl RawMessage {
    fn into_kind(self) -> Option<UpdateKind> {
        let text = self.text?;
        let command = self
            .entities
            .iter()
            .find(|entity| entity.kind == BOT_COMMAND && entity.offset == 0);
        match command {
            Some(entity) => {
                let raw = utf16_prefix(&text, entity.length);
                let name = raw.trim_start_matches('/');
                let name = name.split('@').next().unwrap_or(name).to_string();
                Some(UpdateKind::Command { name, text })
            }
            None => Some(UpdateKind::PlainMessage { text }),
        }
    }
}

/// Leading part of `text` spanning `units` UTF-16 code units, the unit entity offsets use.
fn utf16_prefix(text: &str, units: usize) -> &str {
    let mut consumed = 0;
    for (index, ch) in text.char_indices() {
        if consumed >= units {
            return &text[..index];
        }
        consumed += ch.len_utf16();
    }
    text
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct DeleteWebhookRequest {
    pub drop_pending_updates: bool,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQueryRequest {
    pub callback_query_id: String,
    pub text: String,
}

impl SendMessageRequest {
    pub fn new(chat_id: i64, message: OutgoingMessage) -> Self {
        let parse_mode = match message.parse_mode {
            ParseMode::Plain => None,
            ParseMode::Markdown => Some("Markdown"),
        };
        Self {
            chat_id,
            text: message.text,
            parse_mode,
            reply_markup: message.options.map(keyboard),
        }
    }
}

fn keyboard(rows: Vec<Vec<InlineOption>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|option| InlineKeyboardButton {
                        text: option.label,
                        callback_data: option.token,
                    })
                    .collect()
            })
            .collect(),
    }
}
