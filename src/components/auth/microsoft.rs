use super::models::{Credentials, Provider, UserProfile};
use crate::config::MicrosoftConfig;
use crate::error::{oauth_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

/// Sign-in only; no calendar scope is requested
pub const OIDC_SCOPES: &str = "openid profile email";

/// Subset of the OpenID provider metadata document
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMetadata {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    preferred_username: Option<String>,
}

/// Microsoft Entra ID sign-in through OpenID Connect.
///
/// Endpoints come from the tenant's discovery document, fetched on first use.
#[derive(Debug)]
pub struct MicrosoftOidc {
    config: MicrosoftConfig,
    client: Client,
    metadata: OnceCell<ProviderMetadata>,
}

impl MicrosoftOidc {
    pub fn new(config: MicrosoftConfig, client: Client) -> Self {
        Self {
            config,
            client,
            metadata: OnceCell::new(),
        }
    }

    /// `{authority}/{tenant}/v2.0/.well-known/openid-configuration`
    pub fn discovery_url(&self) -> String {
        format!(
            "{}/{}/v2.0/.well-known/openid-configuration",
            self.config.authority.trim_end_matches('/'),
            self.config.tenant_id
        )
    }

    async fn metadata(&self) -> AppResult<&ProviderMetadata> {
        self.metadata
            .get_or_try_init(|| async {
                let url = self.discovery_url();
                debug!("Fetching OpenID metadata from {}", url);

                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| oauth_error(&format!("Failed to fetch OpenID metadata: {}", e)))?;

                if !response.status().is_success() {
                    return Err(oauth_error(&format!(
                        "Failed to fetch OpenID metadata: HTTP {}",
                        response.status()
                    )));
                }

                response
                    .json::<ProviderMetadata>()
                    .await
                    .map_err(|e| oauth_error(&format!("Invalid OpenID metadata: {}", e)))
            })
            .await
    }

    /// Authorization endpoint URL for a new login
    pub async fn authorization_url(&self, csrf_state: &str) -> AppResult<Url> {
        let metadata = self.metadata().await?;
        let mut url = Url::parse(&metadata.authorization_endpoint)
            .map_err(|e| oauth_error(&format!("Invalid authorization endpoint: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("response_mode", "query")
            .append_pair("scope", OIDC_SCOPES)
            .append_pair("state", csrf_state);

        Ok(url)
    }

    /// Exchange the code and fetch the user's profile
    pub async fn complete(&self, code: &str) -> AppResult<Credentials> {
        let metadata = self.metadata().await?;

        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("scope", OIDC_SCOPES),
        ];

        let response = self
            .client
            .post(&metadata.token_endpoint)
            .form(&params)
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

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| oauth_error(&format!("Invalid token response: {}", e)))?;

        let profile = self.user_profile(metadata, &tokens.access_token).await?;
        info!("Microsoft sign-in for subject {}", profile.subject);

        Ok(Credentials {
            provider: Provider::Microsoft,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_in.map(|s| Utc::now().timestamp() + s),
            profile: Some(profile),
        })
    }

    async fn user_profile(&self, metadata: &ProviderMetadata, access_token: &str) -> AppResult<UserProfile> {
        let response = self
            .client
            .get(&metadata.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| oauth_error(&format!("Failed to get user info: {}", e)))?;

        if !response.status().is_success() {
            return Err(oauth_error(&format!(
                "Failed to get user info: HTTP {}",
                response.status()
            )));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| oauth_error(&format!("Invalid user info response: {}", e)))?;

        Ok(UserProfile {
            subject: info.sub,
            name: info.name,
            email: info.email.or(info.preferred_username),
        })
    }
}
