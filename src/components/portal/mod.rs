//! Timetable portal scraping.
//!
//! The portal renders the personal timetable as an HTML table; this component fetches
//! that page with the configured session cookie and turns each row into a
//! [`ScheduleEntry`].

mod client;
pub mod models;
pub mod parser;

pub use client::PortalClient;
pub use models::ScheduleEntry;
pub use parser::parse_schedule;
