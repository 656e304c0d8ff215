use crate::components::auth::{Credentials, Provider};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Where a browser session is in the login flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuthState {
    Anonymous,
    /// Redirected to a provider; `csrf_state` must come back on the callback
    AwaitingCallback { provider: Provider, csrf_state: String },
    Authenticated { credentials: Credentials },
}

/// Server-side session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: AuthState,
    /// Creation time as a UTC timestamp
    pub created_at: i64,
}

impl Session {
    /// Start a fresh anonymous session
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            state: AuthState::Anonymous,
            created_at: Utc::now().timestamp(),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.state {
            AuthState::Authenticated { credentials } => Some(credentials),
            _ => None,
        }
    }

    /// Move to `AwaitingCallback` and return the state value to send to the provider
    pub fn begin_login(&mut self, provider: Provider) -> String {
        let csrf_state = uuid::Uuid::new_v4().to_string();
        self.state = AuthState::AwaitingCallback {
            provider,
            csrf_state: csrf_state.clone(),
        };
        csrf_state
    }

    /// Whether a callback for `provider` carrying `state` belongs to this session
    pub fn expects_callback(&self, provider: Provider, state: &str) -> bool {
        matches!(
            &self.state,
            AuthState::AwaitingCallback { provider: p, csrf_state } if *p == provider && csrf_state == state
        )
    }

    pub fn authenticate(&mut self, credentials: Credentials) {
        self.state = AuthState::Authenticated { credentials };
    }

    pub fn reset(&mut self) {
        self.state = AuthState::Anonymous;
    }

    /// Whether a record created at `created_at` has outlived `ttl_seconds` at `now`
    pub fn is_expired_at(&self, now: i64, ttl_seconds: i64) -> bool {
        now - self.created_at >= ttl_seconds
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            provider: Provider::Google,
            access_token: "access".to_string(),
            refresh_token: None,
            expires_at: None,
            profile: None,
        }
    }

    #[test]
    fn test_login_state_machine() {
        let mut session = Session::new();
        assert_eq!(session.state, AuthState::Anonymous);
        assert!(session.credentials().is_none());

        let state = session.begin_login(Provider::Google);
        assert!(session.expects_callback(Provider::Google, &state));
        assert!(!session.expects_callback(Provider::Microsoft, &state));
        assert!(!session.expects_callback(Provider::Google, "forged"));

        session.authenticate(credentials());
        assert_eq!(session.credentials(), Some(&credentials()));
        assert!(!session.expects_callback(Provider::Google, &state));

        session.reset();
        assert!(session.credentials().is_none());
    }

    #[test]
    fn test_new_login_replaces_previous_state() {
        let mut session = Session::new();
        let first = session.begin_login(Provider::Google);
        let second = session.begin_login(Provider::Google);

        assert_ne!(first, second);
        assert!(!session.expects_callback(Provider::Google, &first));
        assert!(session.expects_callback(Provider::Google, &second));
    }

    #[test]
    fn test_session_json_shape() {
        let mut session = Session::new();
        session.authenticate(credentials());

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["state"]["status"], "authenticated");
        assert_eq!(json["state"]["credentials"]["provider"], "google");

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn test_record_expiry() {
        let mut session = Session::new();
        session.created_at = 1_000;

        assert!(!session.is_expired_at(1_000, 60));
        assert!(!session.is_expired_at(1_059, 60));
        assert!(session.is_expired_at(1_060, 60));
    }
}
