use crate::components::{CalendarFetcher, Notifier};
use crate::error::{config_error, NotifierResult};
use crate::pipeline;
use crate::utils::time::{calculate_wait_seconds, next_run_time};
use chrono::Local;
use std::future::Future;
use std::io;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

/// Run the pipeline every day at `notification_time` until `shutdown` resolves
///
/// A failed run is logged and the loop waits for the next day. If `shutdown`
/// resolves with an error (signal handlers could not be installed) it is returned.
pub async fn run_daily<S>(
    fetcher: &dyn CalendarFetcher,
    notifier: &dyn Notifier,
    notification_time: &str,
    shutdown: S,
) -> NotifierResult<()>
where
    S: Future<Output = io::Result<()>>,
{
    tokio::pin!(shutdown);

    loop {
        let now = Local::now();
        let next = next_run_time(&now, notification_time).ok_or_else(|| {
            config_error(&format!("Cannot schedule NOTIFICATION_TIME '{}'", notification_time))
        })?;
        let wait = calculate_wait_seconds(&now, &next);

        info!("Next calendar check scheduled for {}", next);

        tokio::select! {
            _ = sleep(Duration::from_secs(wait)) => {}
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signals: {}", e);
                    return Err(e.into());
                }
                info!("Received shutdown signal, stopping scheduler");
                return Ok(());
            }
        }

        if let Err(e) = pipeline::run(fetcher, notifier, Local::now().date_naive()).await {
            error!("Calendar check failed: {}", e);
        }
    }
}
