use super::models::ScheduleEntry;
use super::parser::parse_schedule;
use crate::config::PortalConfig;
use crate::error::{portal_error, AppResult};
use reqwest::header::{COOKIE, USER_AGENT};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Fetches the timetable page from the portal
#[derive(Debug, Clone)]
pub struct PortalClient {
    config: PortalConfig,
    client: Client,
}

impl PortalClient {
    pub fn new(config: PortalConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Download the timetable page and parse it into entries
    pub async fn fetch_schedule(&self) -> AppResult<Vec<ScheduleEntry>> {
        debug!("Fetching timetable from {}", self.config.schedule_url);

        let response = self
            .client
            .get(&self.config.schedule_url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(COOKIE, &self.config.session_cookie)
            .send()
            .await
            .map_err(|e| portal_error(&format!("Failed to fetch timetable: {}", e)))?;

        if !response.status().is_success() {
            return Err(portal_error(&format!(
                "Failed to fetch timetable: HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| portal_error(&format!("Failed to read timetable page: {}", e)))?;

        let entries = parse_schedule(&body)?;

        if entries.is_empty() {
            // The portal answers 200 with its login page once the session cookie expires
            warn!("Timetable page contained no rows; the portal session cookie may have expired");
        } else {
            info!("Scraped {} timetable rows", entries.len());
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_portal_cookie() {
        let client = PortalClient::new(
            PortalConfig {
                schedule_url: "https://portal.example.edu/Home/Schedules".to_string(),
                user_agent: "Mozilla/5.0".to_string(),
                session_cookie: "ASP.NET_SessionId=live-session".to_string(),
            },
            Client::new(),
        );

        let printed = format!("{:?}", client);
        assert!(!printed.contains("live-session"));
        assert!(printed.contains("portal.example.edu"));
    }
}
