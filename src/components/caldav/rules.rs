use super::models::Event;
use chrono::{Datelike, Days, NaiveDate};

/// Which day of the trigger window an event matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerWindow {
    Today,
    OneWeekAhead,
}

/// Whether an event is due a reminder, and what to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDecision {
    pub should_notify: bool,
    pub message: String,
    pub window: Option<TriggerWindow>,
}

/// Format a reminder as `<summary>: DD/MM/YYYY`
pub fn format_message(event: &Event) -> String {
    format!("{}: {}", event.summary, event.start_date.format("%d/%m/%Y"))
}

/// Decide whether `event` is due a reminder on `today`
///
/// Only the day of month is compared, against today and against today plus seven
/// days. Month and year are ignored, so an event a whole number of months away on
/// the same day of month also matches.
pub fn evaluate(event: &Event, today: NaiveDate) -> NotificationDecision {
    let event_day = event.start_date.day();

    let window = if event_day == today.day() {
        Some(TriggerWindow::Today)
    } else if today
        .checked_add_days(Days::new(7))
        .is_some_and(|one_week| event_day == one_week.day())
    {
        Some(TriggerWindow::OneWeekAhead)
    } else {
        None
    };

    match window {
        Some(_) => NotificationDecision {
            should_notify: true,
            message: format_message(event),
            window,
        },
        None => NotificationDecision {
            should_notify: false,
            message: String::new(),
            window: None,
        },
    }
}
