use chrono::{DateTime, Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Time zone the portal timetable is written in
pub const EVENT_TIMEZONE: Tz = chrono_tz::Asia::Ho_Chi_Minh;

/// Every synced class lasts exactly one hour
pub const EVENT_DURATION_MINUTES: i64 = 60;

/// Layouts tried for `"{date} {time}"`
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Start and end of a calendar event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Parse a timetable date and time as a local time in [`EVENT_TIMEZONE`]
pub fn parse_local_datetime(date: &str, time: &str) -> Option<DateTime<Tz>> {
    let raw = format!("{} {}", date.trim(), time.trim());

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())?;

    EVENT_TIMEZONE.from_local_datetime(&naive).single()
}

/// Event window for a timetable row, `None` when the date or time cannot be read
pub fn event_window(date: &str, time: &str) -> Option<EventWindow> {
    let start = parse_local_datetime(date, time)?;
    let end = start + Duration::minutes(EVENT_DURATION_MINUTES);
    Some(EventWindow { start, end })
}
