use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, TimeZone};

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Calculate the next daily run at `time_str`, strictly after `current_time`
pub fn next_daily_time(current_time: &DateTime<Local>, time_str: &str) -> Option<NaiveDateTime> {
    let (hour, minute) = parse_time(time_str)?;

    let mut next_time = current_time.date_naive().and_hms_opt(hour, minute, 0)?;

    // If the time has already passed today, schedule for tomorrow
    if current_time.naive_local() >= next_time {
        next_time = next_time.checked_add_signed(Duration::days(1))?;
    }

    Some(next_time)
}

/// Resolve the next run to a concrete local instant
///
/// A wall-clock time skipped by a DST transition moves on to the following day;
/// an ambiguous one takes the earlier instant.
pub fn next_run_time(current_time: &DateTime<Local>, time_str: &str) -> Option<DateTime<Local>> {
    let mut next = next_daily_time(current_time, time_str)?;

    for _ in 0..2 {
        match Local.from_local_datetime(&next) {
            LocalResult::Single(dt) => return Some(dt),
            LocalResult::Ambiguous(earliest, _) => return Some(earliest),
            LocalResult::None => next = next.checked_add_signed(Duration::days(1))?,
        }
    }

    None
}

/// Seconds to wait until `next_time`, never less than one
pub fn calculate_wait_seconds(now: &DateTime<Local>, next_time: &DateTime<Local>) -> u64 {
    let seconds = next_time.signed_duration_since(*now).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    seconds as u64
}
