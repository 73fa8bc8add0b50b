use crate::components::caldav::{evaluate, parser, Event};
use crate::components::{CalendarFetcher, Notifier};
use crate::error::NotifierResult;
use chrono::NaiveDate;
use tracing::{debug, error, info};

/// What happened to one parsed event during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    NotDue,
    Notified,
    NotifyFailed(String),
}

/// Per-event record of a completed run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(Event, EventOutcome)>,
    /// Non-empty blocks that could not be turned into an event
    pub skipped_blocks: usize,
}

impl RunSummary {
    pub fn notified(&self) -> usize {
        self.count(|outcome| matches!(outcome, EventOutcome::Notified))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, EventOutcome::NotifyFailed(_)))
    }

    fn count(&self, pred: impl Fn(&EventOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, outcome)| pred(outcome)).count()
    }
}

/// Fetch, parse and evaluate the calendar once, notifying every due event
///
/// Only a fetch failure is returned as an error. Malformed blocks and failed
/// notifications are logged and recorded in the summary.
pub async fn run(
    fetcher: &dyn CalendarFetcher,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> NotifierResult<RunSummary> {
    info!("Checking calendar for events on {} and one week ahead", today);

    let response = fetcher.fetch().await?;

    let mut summary = RunSummary::default();
    let mut events = parser::parse_events(&response);
    for event in events.by_ref() {
        debug!("Processing event: {}: {}", event.summary, event.raw_start);

        let decision = evaluate(&event, today);
        let outcome = if decision.should_notify {
            info!("Event '{}' is due ({:?}), sending notification", event.summary, decision.window);
            match notifier.notify(&decision.message).await {
                Ok(()) => EventOutcome::Notified,
                Err(e) => {
                    error!("Failed to send notification for '{}': {}", event.summary, e);
                    EventOutcome::NotifyFailed(e.to_string())
                }
            }
        } else {
            EventOutcome::NotDue
        };

        summary.outcomes.push((event, outcome));
    }
    summary.skipped_blocks = events.skipped();

    info!(
        "Run finished: {} events, {} notified, {} failed, {} skipped",
        summary.outcomes.len(),
        summary.notified(),
        summary.failed(),
        summary.skipped_blocks
    );

    Ok(summary)
}
