use crate::components::portal::ScheduleEntry;
use crate::utils::time::{event_window, EVENT_TIMEZONE};
use serde::{Deserialize, Serialize};

/// Body of an `events.insert` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRequest {
    pub summary: String,
    pub location: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Start or end of an event.
///
/// `date_time` is serialized as `null` when the timetable row could not be read as a
/// date; the insert is still attempted and the API decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: Option<String>,
    pub time_zone: String,
}

/// The part of the created event we keep
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InsertedEvent {
    pub id: String,
}

impl From<&ScheduleEntry> for EventRequest {
    fn from(entry: &ScheduleEntry) -> Self {
        let window = event_window(&entry.date, &entry.time);
        let time_zone = EVENT_TIMEZONE.name().to_string();

        Self {
            summary: entry.subject.clone(),
            location: entry.location.clone(),
            start: EventDateTime {
                date_time: window.map(|w| w.start.to_rfc3339()),
                time_zone: time_zone.clone(),
            },
            end: EventDateTime {
                date_time: window.map(|w| w.end.to_rfc3339()),
                time_zone,
            },
        }
    }
}
