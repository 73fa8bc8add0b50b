use crate::components::Notifier;
use crate::config::Config;
use crate::error::{notify_error, NotifierResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Notifier that posts each message to a Telegram chat through the Bot API
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier for the bot and chat named in the config
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.telegram_api_url.clone(),
            bot_token: config.telegram_bot_token.clone(),
            chat_id: config.telegram_chat_id.clone(),
        }
    }

    /// Build the `sendMessage` URL; query values are percent-encoded here
    pub fn send_message_url(&self, message: &str) -> NotifierResult<Url> {
        let url_str = format!(
            "{}/bot{}/sendMessage",
            self.api_url.trim_end_matches('/'),
            self.bot_token
        );

        let mut url = Url::parse(&url_str)
            .map_err(|e| notify_error(&format!("Failed to parse URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("chat_id", &self.chat_id)
            .append_pair("text", message);

        Ok(url)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> NotifierResult<()> {
        let url = self.send_message_url(message)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            // The request URL carries the bot token
            .map_err(|e| notify_error(&format!("Failed to send message: {}", e.without_url())))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(notify_error(&format!(
                "Telegram rejected message: HTTP {} - {}",
                status, error_body
            )));
        }

        debug!("Delivered message to chat {}", self.chat_id);
        Ok(())
    }
}
