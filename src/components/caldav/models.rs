use chrono::NaiveDate;

/// A calendar event reduced to what the reminder rule needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub summary: String,
    /// Date part of DTSTART; time of day and timezone are dropped
    pub start_date: NaiveDate,
    /// DTSTART value exactly as the server sent it
    pub raw_start: String,
}
