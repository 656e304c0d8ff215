use super::models::{Credentials, Provider};
use crate::config::GoogleConfig;
use crate::error::{config_error, oauth_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

/// Read/write access to the user's calendars
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Lifetime assumed when the token response has no `expires_in`
const DEFAULT_EXPIRES_IN: i64 = 3600;

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// Google authorization-code flow
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: GoogleConfig,
    auth_url: Url,
    client: Client,
}

impl GoogleOAuth {
    pub fn new(config: GoogleConfig, client: Client) -> AppResult<Self> {
        let auth_url = Url::parse(&config.auth_url)
            .map_err(|e| config_error(&format!("Invalid GOOGLE_AUTH_URL: {}", e)))?;

        Ok(Self {
            config,
            auth_url,
            client,
        })
    }

    /// Consent page URL asking for calendar access and a refresh token
    pub fn authorization_url(&self, csrf_state: &str) -> Url {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", CALENDAR_SCOPE)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", csrf_state);
        url
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> AppResult<Credentials> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let tokens = self.request_tokens(&params).await?;
        if tokens.refresh_token.is_none() {
            warn!("No refresh token received - calendar access ends when the access token expires");
        }

        Ok(Self::credentials_from(tokens, None))
    }

    /// Get a new access token with the stored refresh token
    pub async fn refresh(&self, credentials: &Credentials) -> AppResult<Credentials> {
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or_else(|| oauth_error("No refresh token in session"))?;

        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let tokens = self.request_tokens(&params).await?;
        info!("Refreshed Google access token");

        // Google usually omits the refresh token on refresh; keep the one we have
        Ok(Self::credentials_from(tokens, Some(refresh_token)))
    }

    async fn request_tokens(&self, params: &[(&str, &str)]) -> AppResult<GoogleTokenResponse> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| oauth_error(&format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(oauth_error(&format!(
                "Token request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| oauth_error(&format!("Invalid token response: {}", e)))
    }

    fn credentials_from(tokens: GoogleTokenResponse, previous_refresh: Option<&str>) -> Credentials {
        let expires_in = tokens.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);

        Credentials {
            provider: Provider::Google,
            access_token: tokens.access_token,
            refresh_token: tokens
                .refresh_token
                .or_else(|| previous_refresh.map(str::to_string)),
            expires_at: Some(Utc::now().timestamp() + expires_in),
            profile: None,
        }
    }
}
