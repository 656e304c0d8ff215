use super::models::Session;
use crate::error::AppResult;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Storage for session records, keyed by session id
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Get a session by id
    async fn load(&self, id: &str) -> AppResult<Option<Session>>;

    /// Insert or replace a session
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Delete a session
    async fn destroy(&self, id: &str) -> AppResult<()>;
}

/// Upper bound on records held by [`InMemorySessionStore`]
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// In-memory session store.
///
/// Records expire `ttl` after creation, like the cookie that points at them. Expired
/// records are never returned and are swept on every write. When the store is full the
/// oldest record is evicted to make room.
#[derive(Debug)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl_seconds: i64,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_limit(ttl_minutes, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limit(ttl_minutes: i64, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl_seconds: ttl_minutes.max(1) * 60,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Number of stored records, expired ones not yet swept included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> AppResult<Option<Session>> {
        let now = Utc::now().timestamp();
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(id)
            .filter(|session| !session.is_expired_at(now, self.ttl_seconds))
            .cloned())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let now = Utc::now().timestamp();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, stored| !stored.is_expired_at(now, self.ttl_seconds));

        if !sessions.contains_key(&session.id) && sessions.len() >= self.max_sessions {
            let oldest = sessions
                .values()
                .min_by_key(|stored| stored.created_at)
                .map(|stored| stored.id.clone());
            if let Some(oldest) = oldest {
                debug!("Session store full, evicting {}", oldest);
                sessions.remove(&oldest);
            }
        }

        sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn destroy(&self, id: &str) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
        Ok(())
    }
}
