use super::models::Session;
use super::store::SessionStore;
use crate::error::{session_error, AppResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::info;

/// Redis key prefix for session records
const SESSION_KEY_PREFIX: &str = "timetable_sync:session:";

/// Redis-backed session store; records expire together with the session cookie
pub struct RedisSessionStore {
    client: RedisClient,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Create a store and check that Redis answers
    pub async fn connect(redis_url: &str, ttl_minutes: i64) -> AppResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| session_error(&format!("Failed to create Redis client: {}", e)))?;

        let store = Self {
            client,
            ttl_seconds: (ttl_minutes.max(1) as u64) * 60,
        };

        let mut conn = store.get_connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| session_error(&format!("Redis PING error: {}", e)))?;

        Ok(store)
    }

    async fn get_connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| session_error(&format!("Failed to connect to Redis: {}", e)))
    }

    fn key(id: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> AppResult<Option<Session>> {
        let mut conn = self.get_connection().await?;

        let data: Option<String> = conn
            .get(Self::key(id))
            .await
            .map_err(|e| session_error(&format!("Redis GET error: {}", e)))?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        let mut conn = self.get_connection().await?;
        let json = serde_json::to_string(session)?;

        conn.set_ex::<_, _, ()>(Self::key(&session.id), json, self.ttl_seconds)
            .await
            .map_err(|e| session_error(&format!("Redis SET error: {}", e)))?;

        Ok(())
    }

    async fn destroy(&self, id: &str) -> AppResult<()> {
        let mut conn = self.get_connection().await?;

        conn.del::<_, ()>(Self::key(id))
            .await
            .map_err(|e| session_error(&format!("Redis DEL error: {}", e)))?;

        Ok(())
    }
}
