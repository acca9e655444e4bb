//! Telegram Bot API notifier

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::services::notifier::Notifier;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
    chat_id: Option<String>,
}

impl TelegramNotifier {
    pub fn new(api_url: impl Into<String>, token: Option<String>, chat_id: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(api_url, token, chat_id, client)
    }

    pub fn with_client(
        api_url: impl Into<String>,
        token: Option<String>,
        chat_id: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
            chat_id,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> bool {
        let (Some(token), Some(chat_id)) = (&self.token, &self.chat_id) else {
            warn!("Telegram: token or chat id missing, message dropped");
            return false;
        };

        let url = format!("{}/bot{}/sendMessage", self.api_url, token);
        let form = [("chat_id", chat_id.as_str()), ("text", text)];

        match self.client.post(&url).form(&form).send().await {
            Ok(response) if response.status().is_success() => {
                let preview: String = text.chars().take(50).collect();
                info!(preview = %preview, "Telegram: message sent");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %body, "Telegram: send rejected");
                false
            }
            Err(e) => {
                error!(error = %e, "Telegram: connection error");
                false
            }
        }
    }
}
