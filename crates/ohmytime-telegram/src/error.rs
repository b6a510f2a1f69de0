//! Error types for Bot API calls.

use thiserror::Error;

/// Errors returned by Bot API calls.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Transport or decoding failure; the url is stripped so the token never leaks.
    #[error("http error: {0}")]
    Http(reqwest::Error),
    /// Bot API answered with `ok: false`.
    #[error("api error (code={code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
    /// Bot API answered `ok: true` without a result.
    #[error("missing result for {0}")]
    MissingResult(&'static str),
}

impl From<reqwest::Error> for TelegramError {
    fn from(err: reqwest::Error) -> Self {
        TelegramError::Http(err.without_url())
    }
}
