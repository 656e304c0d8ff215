//! Google Calendar event submission.
//!
//! Each scraped timetable row becomes one `events.insert` call on the user's calendar.
//! Calls are made one at a time, in timetable order, and the first failure aborts the
//! rest. Nothing is deduplicated: syncing the same timetable twice inserts every event
//! twice.

mod client;
pub mod models;
mod sync;

pub use client::GoogleCalendarClient;
pub use models::{EventDateTime, EventRequest, InsertedEvent};
pub use sync::sync_schedule;
