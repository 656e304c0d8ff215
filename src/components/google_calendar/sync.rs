use super::client::GoogleCalendarClient;
use super::models::{EventRequest, InsertedEvent};
use crate::components::portal::ScheduleEntry;
use crate::error::AppResult;
use tracing::{info, warn};

/// Push every entry to the calendar, one insert at a time and in order.
///
/// Stops at the first failed insert; events created before it stay in the calendar.
pub async fn sync_schedule(
    calendar: &GoogleCalendarClient,
    access_token: &str,
    entries: &[ScheduleEntry],
) -> AppResult<Vec<InsertedEvent>> {
    let mut inserted = Vec::with_capacity(entries.len());

    for entry in entries {
        let event = EventRequest::from(entry);
        if event.start.date_time.is_none() {
            warn!(
                "Could not read date '{}' and time '{}' for {}",
                entry.date, entry.time, entry.subject
            );
        }

        inserted.push(calendar.insert_event(access_token, &event).await?);
    }

    info!("Synced {} events to Google Calendar", inserted.len());
    Ok(inserted)
}
