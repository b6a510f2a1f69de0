//! HTTP client for the Bot API.

use crate::error::TelegramError;
use crate::wire::{
    AnswerCallbackQueryRequest, ApiResponse, DeleteWebhookRequest, GetUpdatesRequest, RawUpdate,
    SendMessageRequest,
};
use async_trait::async_trait;
use log::{debug, info};
use ohmytime_protocol::{ChatId, OutgoingMessage, ProtocolError, Sender};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Slack added on top of the long-polling timeout for the HTTP request timeout.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(10);

/// Bot API client bound to one bot token.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    /// Create a client; `polling_timeout` bounds how long `getUpdates` may hang.
    pub fn new(
        api_url: &str,
        token: &str,
        polling_timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(polling_timeout + REQUEST_TIMEOUT_SLACK)
            .build()?;
        info!("telegram client initialized (api_url={})", api_url);
        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    async fn call<Req, Res>(&self, method: &'static str, body: &Req) -> Result<Res, TelegramError>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        let response: ApiResponse<Res> = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        if !response.ok {
            return Err(TelegramError::Api {
                code: response.error_code,
                description: response.description.unwrap_or_default(),
            });
        }
        response.result.ok_or(TelegramError::MissingResult(method))
    }

    /// Remove any webhook so that long polling receives updates.
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &DeleteWebhookRequest {
                    drop_pending_updates: false,
                },
            )
            .await?;
        debug!("webhook removed");
        Ok(())
    }

    /// Long-poll for updates starting at `offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<RawUpdate>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
                allowed_updates: vec!["message", "callback_query"],
            },
        )
        .await
    }

    /// Send a message, with an inline keyboard when options are attached.
    pub async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutgoingMessage,
    ) -> Result<(), TelegramError> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessageRequest::new(chat_id, message))
            .await?;
        Ok(())
    }

    /// Answer a callback query so the client stops showing a spinner.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: &str,
    ) -> Result<(), TelegramError> {
        let _: bool = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQueryRequest {
                    callback_query_id: callback_query_id.to_string(),
                    text: text.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Sender for TelegramClient {
    async fn send(&self, chat_id: ChatId, message: OutgoingMessage) -> Result<(), ProtocolError> {
        self.send_message(chat_id, message)
            .await
            .map_err(|err| ProtocolError::Delivery(err.to_string()))
    }

    async fn acknowledge(&self, callback_id: &str, text: &str) -> Result<(), ProtocolError> {
        self.answer_callback_query(callback_id, text)
            .await
            .map_err(|err| ProtocolError::Delivery(err.to_string()))
    }
}
