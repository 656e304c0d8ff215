use super::models::{EventRequest, InsertedEvent};
use crate::config::GoogleConfig;
use crate::error::{google_calendar_error, AppResult};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Thin client for the Calendar v3 events endpoint.
///
/// Holds no credentials; the caller passes the access token of the current session
/// on every call.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    api_url: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(config: &GoogleConfig, client: Client) -> Self {
        Self {
            client,
            api_url: config.calendar_api_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
        }
    }

    fn events_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API URL cannot be a base"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);

        Ok(url)
    }

    /// Create one event
    pub async fn insert_event(&self, access_token: &str, event: &EventRequest) -> AppResult<InsertedEvent> {
        let url = self.events_url()?;

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to insert event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to insert event: HTTP {} - {}",
                status, error_body
            )));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse insert response: {}", e)))?;

        debug!("Inserted event {} ({})", inserted.id, event.summary);
        Ok(inserted)
    }
}
