use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::traits::{DeliveryChannel, DeliveryError};
use crate::models::{NotificationMessage, RecipientId};

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Body of a `sendMessage` call
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: String,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Envelope returned by every Bot API method
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// Telegram Bot API delivery channel
///
/// One `reqwest::Client` (and its connection pool) is shared by every send.
pub struct TelegramChannel {
    api_base_url: String,
    bot_token: String,
    parse_mode: String,
    client: Client,
}

impl TelegramChannel {
    pub fn new(
        api_base_url: String,
        bot_token: String,
        parse_mode: String,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            api_base_url,
            bot_token,
            parse_mode,
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }
}

#[async_trait]
impl DeliveryChannel for TelegramChannel {
    async fn send(
        &self,
        recipient: &RecipientId,
        message: &NotificationMessage,
    ) -> Result<(), DeliveryError> {
        let request = SendMessageRequest {
            chat_id: recipient.as_str(),
            text: message.to_string(),
            parse_mode: &self.parse_mode,
            disable_web_page_preview: false,
        };

        // Errors are stripped of their URL, it contains the bot token
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();

        if status.is_success() && body.as_ref().map_or(false, |b| b.ok) {
            tracing::trace!("Delivered message to {}", recipient);
            return Ok(());
        }

        Err(classify_failure(status, body))
    }
}

/// Map a failed Bot API response to a delivery error
fn classify_failure(status: StatusCode, body: Option<ApiResponse>) -> DeliveryError {
    let description = body
        .as_ref()
        .and_then(|b| b.description.clone())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::FORBIDDEN => DeliveryError::Blocked(description),
        StatusCode::BAD_REQUEST if is_recipient_error(&description) => {
            DeliveryError::InvalidRecipient(description)
        }
        StatusCode::TOO_MANY_REQUESTS => DeliveryError::RateLimited {
            retry_after: body.and_then(|b| b.parameters).and_then(|p| p.retry_after),
        },
        _ => DeliveryError::Api {
            status: status.as_u16(),
            description,
        },
    }
}

/// 400 descriptions that point at the chat rather than the message
fn is_recipient_error(description: &str) -> bool {
    const RECIPIENT_ERRORS: &[&str] = &["chat not found", "user not found", "peer_id_invalid", "chat_id is empty"];

    let description = description.to_lowercase();
    RECIPIENT_ERRORS.iter().any(|marker| description.contains(marker))
}
