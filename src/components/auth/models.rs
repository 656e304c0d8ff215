use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identity provider a session authenticated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Google,
    Microsoft,
}

/// Basic profile returned by the OpenID-Connect userinfo endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub subject: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Tokens and identity stored in the session after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub provider: Provider,
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as a UTC timestamp
    pub expires_at: Option<i64>,
    pub profile: Option<UserProfile>,
}

/// Refresh a little before the provider would reject the token
const EXPIRY_MARGIN_SECONDS: i64 = 60;

impl Credentials {
    /// Whether these credentials may write to Google Calendar.
    ///
    /// Microsoft logins only carry an OpenID profile; calendar sync is not supported
    /// for them.
    pub fn can_sync_calendar(&self) -> bool {
        self.provider == Provider::Google
    }

    /// Whether the access token is expired (or about to be)
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expiry) => expiry - EXPIRY_MARGIN_SECONDS <= now,
            None => false,
        }
    }

    /// Name to greet the user with, if the provider gave one
    pub fn display_name(&self) -> Option<&str> {
        let profile = self.profile.as_ref()?;
        profile.name.as_deref().or(profile.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn google(expires_at: Option<i64>) -> Credentials {
        Credentials {
            provider: Provider::Google,
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at,
            profile: None,
        }
    }

    #[test]
    fn test_expiry() {
        assert!(!google(None).is_expired_at(1_000));
        assert!(!google(Some(2_000)).is_expired_at(1_000));
        assert!(google(Some(1_030)).is_expired_at(1_000));
        assert!(google(Some(900)).is_expired_at(1_000));
    }

    #[test]
    fn test_only_google_can_sync() {
        let mut credentials = google(None);
        assert!(credentials.can_sync_calendar());

        credentials.provider = Provider::Microsoft;
        assert!(!credentials.can_sync_calendar());
    }

    #[test]
    fn test_display_name_prefers_name() {
        let mut credentials = google(None);
        assert_eq!(credentials.display_name(), None);

        credentials.profile = Some(UserProfile {
            subject: "sub".to_string(),
            name: None,
            email: Some("student@example.edu".to_string()),
        });
        assert_eq!(credentials.display_name(), Some("student@example.edu"));

        if let Some(profile) = credentials.profile.as_mut() {
            profile.name = Some("Nguyen Van A".to_string());
        }
        assert_eq!(credentials.display_name(), Some("Nguyen Van A"));
    }
}
