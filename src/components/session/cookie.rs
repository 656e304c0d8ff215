use crate::error::{session_error, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "sid";

/// Claims carried by the session cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Session id
    pub sub: String,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
}

/// Signs and verifies session cookie values
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
}

impl SessionSigner {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    /// Produce a signed cookie value for `session_id`
    pub fn sign(&self, session_id: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.ttl_minutes);

        let claims = SessionClaims {
            sub: session_id.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| session_error(&format!("Failed to sign session cookie: {}", e)))
    }

    /// Session id inside a cookie value, `None` if forged or expired
    pub fn verify(&self, value: &str) -> Option<String> {
        decode::<SessionClaims>(value, &self.decoding_key, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|e| debug!("Rejected session cookie: {:?}", e))
            .ok()
    }
}
