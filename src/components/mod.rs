pub mod auth;
pub mod google_calendar;
pub mod portal;
pub mod session;
