use crate::shutdown;
use calendar_notifier::components::{CalDavClient, TelegramNotifier};
use calendar_notifier::config::Config;
use calendar_notifier::error::Error;
use calendar_notifier::{pipeline, scheduler};
use chrono::Local;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Run once, or daily at `NOTIFICATION_TIME` until a shutdown signal arrives
pub async fn start(config: Config) -> miette::Result<()> {
    let fetcher = CalDavClient::new(&config);
    let notifier = TelegramNotifier::new(&config);

    match config.notification_time.as_deref() {
        Some(notification_time) => {
            scheduler::run_daily(
                &fetcher,
                &notifier,
                notification_time,
                shutdown::wait_for_signal(),
            )
            .await?;
        }
        None => {
            pipeline::run(&fetcher, &notifier, Local::now().date_naive()).await?;
        }
    }

    info!("Program finished");
    Ok(())
}
