use crate::error::NotifierResult;
use async_trait::async_trait;

// Export components
pub mod caldav;
pub mod telegram;

pub use caldav::CalDavClient;
pub use telegram::TelegramNotifier;

/// Source of the raw calendar text the pipeline parses
#[async_trait]
pub trait CalendarFetcher: Send + Sync {
    /// Fetch the server's raw response; any error aborts the run
    async fn fetch(&self) -> NotifierResult<String>;
}

/// Destination for reminder messages
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` verbatim
    async fn notify(&self, message: &str) -> NotifierResult<()>;
}
