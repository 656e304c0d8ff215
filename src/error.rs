use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(timetable_sync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(timetable_sync::config))]
    Config(String),

    #[error("OAuth error: {0}")]
    #[diagnostic(code(timetable_sync::oauth))]
    OAuth(String),

    #[error("Portal error: {0}")]
    #[diagnostic(code(timetable_sync::portal))]
    Portal(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(timetable_sync::google_calendar))]
    GoogleCalendar(String),

    #[error("Session error: {0}")]
    #[diagnostic(code(timetable_sync::session))]
    Session(String),

    #[error("Template error: {0}")]
    #[diagnostic(code(timetable_sync::template))]
    Template(#[from] askama::Error),

    #[error(transparent)]
    #[diagnostic(code(timetable_sync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(timetable_sync::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(timetable_sync::other))]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Every failure that reaches a handler becomes the same opaque 500.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            t!("error.generic").to_string(),
        )
            .into_response()
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create OAuth errors
pub fn oauth_error(message: &str) -> Error {
    Error::OAuth(message.to_string())
}

/// Helper to create portal errors
pub fn portal_error(message: &str) -> Error {
    Error::Portal(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create session errors
pub fn session_error(message: &str) -> Error {
    Error::Session(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
