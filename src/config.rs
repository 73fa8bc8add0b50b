use crate::error::{config_error, env_error, NotifierResult};
use crate::utils::time::parse_time;
use dotenvy::dotenv;
use std::env;
use url::Url;

/// Default base URL of the Telegram Bot API
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Main configuration structure for the notifier
#[derive(Debug, Clone)]
pub struct Config {
    /// CalDAV calendar collection URL queried with REPORT
    pub caldav_server_url: String,
    /// CalDAV basic auth username
    pub caldav_username: String,
    /// CalDAV basic auth password
    pub caldav_password: String,
    /// Telegram bot token
    pub telegram_bot_token: String,
    /// Telegram chat to deliver reminders to
    pub telegram_chat_id: String,
    /// Base URL of the Telegram Bot API
    pub telegram_api_url: String,
    /// Daily run time in HH:MM; `None` means run once and exit
    pub notification_time: Option<String>,
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> NotifierResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> NotifierResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> NotifierResult<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| env_error(key))
        };

        let caldav_server_url = required("CALDAV_SERVER_URL")?;
        let caldav_username = required("CALDAV_SERVER_USERNAME")?;
        let caldav_password = required("CALDAV_SERVER_PASSWORD")?;
        let telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;
        let telegram_chat_id = required("TELEGRAM_CHAT_ID")?;

        let telegram_api_url = lookup("TELEGRAM_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());

        let notification_time = lookup("NOTIFICATION_TIME").filter(|value| !value.trim().is_empty());

        let config = Config {
            caldav_server_url,
            caldav_username,
            caldav_password,
            telegram_bot_token,
            telegram_chat_id,
            telegram_api_url,
            notification_time,
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would only fail later at request or schedule time
    fn validate(&self) -> NotifierResult<()> {
        Url::parse(&self.caldav_server_url)
            .map_err(|e| config_error(&format!("Invalid CALDAV_SERVER_URL: {}", e)))?;
        Url::parse(&self.telegram_api_url)
            .map_err(|e| config_error(&format!("Invalid TELEGRAM_API_URL: {}", e)))?;

        if let Some(time) = &self.notification_time {
            if parse_time(time).is_none() {
                return Err(config_error(&format!(
                    "Invalid NOTIFICATION_TIME '{}', expected HH:MM",
                    time
                )));
            }
        }

        Ok(())
    }

    /// Whether the process should stay resident and run daily
    pub fn is_scheduled(&self) -> bool {
        self.notification_time.is_some()
    }
}
