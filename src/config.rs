use crate::error::{config_error, env_error, AppResult};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::net::IpAddr;
use url::Url;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;
/// Default session lifetime (24 hours)
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24;
/// Timetable page of the university portal
pub const DEFAULT_PORTAL_SCHEDULE_URL: &str = "https://portal.huflit.edu.vn/Home/Schedules";
pub const DEFAULT_PORTAL_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_GOOGLE_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Optional portal overrides file
const PORTAL_CONFIG_FILE: &str = "config/portal.toml";

/// Main configuration structure for the web app
#[derive(Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_address: IpAddr,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Secret used to sign session cookies
    pub session_secret: String,
    /// Session lifetime in minutes
    pub session_ttl_minutes: i64,
    /// Whether the session cookie is marked `Secure`
    pub session_cookie_secure: bool,
    /// Redis URL for the session store; in-memory when absent
    pub redis_url: Option<String>,
    /// Locale for user-facing text
    pub locale: String,
    /// Directory served as static files
    pub public_dir: String,
    pub google: GoogleConfig,
    /// Present only when a Microsoft tenant is configured
    pub microsoft: Option<MicrosoftConfig>,
    pub portal: PortalConfig,
}

/// Google OAuth client and API endpoints
#[derive(Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub calendar_api_url: String,
    /// Calendar that receives the events
    pub calendar_id: String,
}

/// Microsoft OpenID-Connect client
#[derive(Clone)]
pub struct MicrosoftConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Base of the discovery URL, `{authority}/{tenant}/v2.0/.well-known/openid-configuration`
    pub authority: String,
}

/// Timetable portal access.
///
/// `session_cookie` is a portal session that was copied out of a browser. The portal
/// expires it after a while, so it has to be rotated by hand.
#[derive(Clone)]
pub struct PortalConfig {
    pub schedule_url: String,
    pub user_agent: String,
    /// Full cookie header value, e.g. `ASP.NET_SessionId=...`
    pub session_cookie: String,
}

/// Shape of `config/portal.toml`
#[derive(Debug, Default, Deserialize)]
pub struct PortalFileConfig {
    pub schedule_url: Option<String>,
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from `.env`, the environment and `config/portal.toml`
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_source(|key| env::var(key).ok())?;

        if let Ok(content) = fs::read_to_string(PORTAL_CONFIG_FILE) {
            let file_config: PortalFileConfig = toml::from_str(&content)?;
            config.merge_portal_file(
                file_config,
                env::var("PORTAL_SCHEDULE_URL").is_ok(),
                env::var("PORTAL_USER_AGENT").is_ok(),
            );
        }

        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from any key lookup
    pub fn from_source<F>(get: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| get(key).filter(|v| !v.is_empty()).ok_or_else(|| env_error(key));
        let optional = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bind_address = optional("BIND_ADDRESS", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|_| config_error("Invalid BIND_ADDRESS format"))?;

        let port = match get("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            None => DEFAULT_PORT,
        };

        let session_ttl_minutes = match get("SESSION_TTL_MINUTES") {
            Some(v) => v
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| config_error("Invalid SESSION_TTL_MINUTES format"))?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };

        let session_cookie_secure = get("SESSION_COOKIE_SECURE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        // Older deployments call this CALLBACK_URL
        let redirect_uri = get("GOOGLE_REDIRECT_URI")
            .or_else(|| get("CALLBACK_URL"))
            .filter(|v| !v.is_empty())
            .ok_or_else(|| env_error("GOOGLE_REDIRECT_URI"))?;

        let google = GoogleConfig {
            client_id: required("GOOGLE_CLIENT_ID")?,
            client_secret: required("GOOGLE_CLIENT_SECRET")?,
            redirect_uri,
            auth_url: optional("GOOGLE_AUTH_URL", DEFAULT_GOOGLE_AUTH_URL),
            token_url: optional("GOOGLE_TOKEN_URL", DEFAULT_GOOGLE_TOKEN_URL),
            calendar_api_url: optional("GOOGLE_CALENDAR_API_URL", DEFAULT_GOOGLE_CALENDAR_API_URL),
            calendar_id: optional("GOOGLE_CALENDAR_ID", "primary"),
        };

        // Microsoft is all-or-nothing, keyed on the tenant id
        let microsoft = match get("MICROSOFT_TENANT_ID").filter(|v| !v.is_empty()) {
            Some(tenant_id) => Some(MicrosoftConfig {
                tenant_id,
                client_id: required("MICROSOFT_CLIENT_ID")?,
                client_secret: required("MICROSOFT_CLIENT_SECRET")?,
                redirect_uri: required("MICROSOFT_REDIRECT_URI")?,
                authority: optional("MICROSOFT_AUTHORITY", DEFAULT_MICROSOFT_AUTHORITY),
            }),
            None => None,
        };

        let portal = PortalConfig {
            schedule_url: optional("PORTAL_SCHEDULE_URL", DEFAULT_PORTAL_SCHEDULE_URL),
            user_agent: optional("PORTAL_USER_AGENT", DEFAULT_PORTAL_USER_AGENT),
            session_cookie: required("PORTAL_SESSION_COOKIE")?,
        };

        Ok(Config {
            bind_address,
            port,
            session_secret: required("SESSION_SECRET")?,
            session_ttl_minutes,
            session_cookie_secure,
            redis_url: get("REDIS_URL").filter(|v| !v.is_empty()),
            locale: optional("APP_LOCALE", "en"),
            public_dir: optional("PUBLIC_DIR", "public"),
            google,
            microsoft,
            portal,
        })
    }

    /// Apply values from `config/portal.toml` unless the environment already set them
    pub fn merge_portal_file(&mut self, file: PortalFileConfig, url_from_env: bool, agent_from_env: bool) {
        if let (Some(url), false) = (file.schedule_url, url_from_env) {
            self.portal.schedule_url = url;
        }
        if let (Some(agent), false) = (file.user_agent, agent_from_env) {
            self.portal.user_agent = agent;
        }
    }

    /// Check that every configured endpoint is a usable URL
    pub fn validate(&self) -> AppResult<()> {
        let mut urls = vec![
            ("GOOGLE_REDIRECT_URI", &self.google.redirect_uri),
            ("GOOGLE_AUTH_URL", &self.google.auth_url),
            ("GOOGLE_TOKEN_URL", &self.google.token_url),
            ("GOOGLE_CALENDAR_API_URL", &self.google.calendar_api_url),
            ("PORTAL_SCHEDULE_URL", &self.portal.schedule_url),
        ];
        if let Some(microsoft) = &self.microsoft {
            urls.push(("MICROSOFT_REDIRECT_URI", &microsoft.redirect_uri));
            urls.push(("MICROSOFT_AUTHORITY", &microsoft.authority));
        }

        for (name, value) in urls {
            Url::parse(value).map_err(|e| config_error(&format!("Invalid {}: {}", name, e)))?;
        }

        Ok(())
    }
}


/// Stand-in printed for secrets
const REDACTED: &str = "<redacted>";

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("session_secret", &REDACTED)
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .field("session_cookie_secure", &self.session_cookie_secure)
            .field("redis_url", &self.redis_url.as_ref().map(|_| REDACTED))
            .field("locale", &self.locale)
            .field("public_dir", &self.public_dir)
            .field("google", &self.google)
            .field("microsoft", &self.microsoft)
            .field("portal", &self.portal)
            .finish()
    }
}

impl fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("calendar_api_url", &self.calendar_api_url)
            .field("calendar_id", &self.calendar_id)
            .finish()
    }
}

impl fmt::Debug for MicrosoftConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MicrosoftConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("redirect_uri", &self.redirect_uri)
            .field("authority", &self.authority)
            .finish()
    }
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("schedule_url", &self.schedule_url)
            .field("user_agent", &self.user_agent)
            .field("session_cookie", &REDACTED)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GOOGLE_CLIENT_ID", "client-id"),
            ("GOOGLE_CLIENT_SECRET", "client-secret"),
            ("GOOGLE_REDIRECT_URI", "http://localhost:3000/auth/google/callback"),
            ("SESSION_SECRET", "secret"),
            ("PORTAL_SESSION_COOKIE", "ASP.NET_SessionId=abc"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> AppResult<Config> {
        Config::from_source(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.session_ttl_minutes, DEFAULT_SESSION_TTL_MINUTES);
        assert!(!config.session_cookie_secure);
        assert!(config.redis_url.is_none());
        assert!(config.microsoft.is_none());
        assert_eq!(config.google.calendar_id, "primary");
        assert_eq!(config.portal.schedule_url, DEFAULT_PORTAL_SCHEDULE_URL);
        assert_eq!(config.portal.user_agent, "Mozilla/5.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_callback_url_fallback() {
        let mut vars = base_vars();
        vars.remove("GOOGLE_REDIRECT_URI");
        vars.insert("CALLBACK_URL", "http://example.test/cb");

        let config = load(&vars).unwrap();
        assert_eq!(config.google.redirect_uri, "http://example.test/cb");
    }

    #[test]
    fn test_missing_required_values() {
        for key in ["GOOGLE_CLIENT_ID", "SESSION_SECRET", "PORTAL_SESSION_COOKIE"] {
            let mut vars = base_vars();
            vars.remove(key);
            let err = load(&vars).unwrap_err();
            assert!(err.to_string().contains(key), "{} should be reported", key);
        }
    }

    #[test]
    fn test_microsoft_requires_full_block() {
        let mut vars = base_vars();
        vars.insert("MICROSOFT_TENANT_ID", "tenant");
        assert!(load(&vars).is_err());

        vars.insert("MICROSOFT_CLIENT_ID", "ms-client");
        vars.insert("MICROSOFT_CLIENT_SECRET", "ms-secret");
        vars.insert("MICROSOFT_REDIRECT_URI", "http://localhost:3000/auth/microsoft/callback");
        let config = load(&vars).unwrap();
        let microsoft = config.microsoft.unwrap();
        assert_eq!(microsoft.tenant_id, "tenant");
        assert_eq!(microsoft.authority, DEFAULT_MICROSOFT_AUTHORITY);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut vars = base_vars();
        vars.insert("REDIS_URL", "redis://:hunter2@localhost:6379");
        vars.insert("MICROSOFT_TENANT_ID", "tenant");
        vars.insert("MICROSOFT_CLIENT_ID", "ms-client");
        vars.insert("MICROSOFT_CLIENT_SECRET", "ms-secret");
        vars.insert("MICROSOFT_REDIRECT_URI", "http://localhost:3000/auth/microsoft/callback");
        let config = load(&vars).unwrap();

        let printed = format!("{:?}", config);
        for secret in ["client-secret", "ms-secret", "ASP.NET_SessionId=abc", "hunter2"] {
            assert!(!printed.contains(secret), "{} leaked", secret);
        }
        assert!(!printed.contains("session_secret: \"secret\""));
        assert!(printed.contains("client-id"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_numbers() {
        let mut vars = base_vars();
        vars.insert("PORT", "not-a-port");
        assert!(load(&vars).is_err());

        let mut vars = base_vars();
        vars.insert("SESSION_TTL_MINUTES", "0");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_portal_file_respects_environment() {
        let mut config = load(&base_vars()).unwrap();
        let file = PortalFileConfig {
            schedule_url: Some("https://portal.example.test/schedule".to_string()),
            user_agent: Some("FileAgent".to_string()),
        };

        config.merge_portal_file(file, false, true);
        assert_eq!(config.portal.schedule_url, "https://portal.example.test/schedule");
        assert_eq!(config.portal.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = load(&base_vars()).unwrap();
        config.google.token_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
