//! Browser sessions.
//!
//! The browser only holds a signed session id; tokens stay server side in a
//! [`SessionStore`].

pub mod cookie;
pub mod models;
mod redis_store;
mod store;

pub use redis_store::RedisSessionStore;
pub use cookie::{SessionSigner, SESSION_COOKIE_NAME};
pub use models::{AuthState, Session};
pub use store::{InMemorySessionStore, SessionStore};

use crate::components::auth::Credentials;
use crate::error::AppResult;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

/// Glue between the cookie jar of a request and the session store
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: Arc<SessionSigner>,
    secure_cookie: bool,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, signer: SessionSigner, secure_cookie: bool) -> Self {
        Self {
            store,
            signer: Arc::new(signer),
            secure_cookie,
        }
    }

    /// Session the request belongs to, if its cookie is valid and the record exists
    pub async fn current(&self, jar: &CookieJar) -> AppResult<Option<Session>> {
        let Some(id) = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| self.signer.verify(cookie.value()))
        else {
            return Ok(None);
        };

        self.store.load(&id).await
    }

    /// Current session, or a new anonymous one
    pub async fn current_or_new(&self, jar: &CookieJar) -> AppResult<Session> {
        Ok(self.current(jar).await?.unwrap_or_default())
    }

    /// Store the session without touching the cookie
    pub async fn save(&self, session: &Session) -> AppResult<()> {
        self.store.save(session).await
    }

    /// Replace `previous` with a new session under a fresh id holding `credentials`,
    /// and point the cookie at it
    pub async fn sign_in(
        &self,
        jar: CookieJar,
        previous: &Session,
        credentials: Credentials,
    ) -> AppResult<(CookieJar, Session)> {
        self.store.destroy(&previous.id).await?;

        let mut session = Session::new();
        session.authenticate(credentials);
        let jar = self.persist(jar, &session).await?;

        Ok((jar, session))
    }

    /// Store the session and (re)issue its cookie
    pub async fn persist(&self, jar: CookieJar, session: &Session) -> AppResult<CookieJar> {
        self.store.save(session).await?;

        let value = self.signer.sign(&session.id)?;
        let cookie = Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            // Lax so the cookie survives the redirect back from the provider
            .same_site(SameSite::Lax)
            .secure(self.secure_cookie)
            .max_age(time::Duration::minutes(self.signer.ttl_minutes()));

        Ok(jar.add(cookie))
    }

    /// Delete the session record and clear the cookie
    pub async fn destroy(&self, jar: CookieJar) -> AppResult<CookieJar> {
        if let Some(session) = self.current(&jar).await? {
            self.store.destroy(&session.id).await?;
        }

        Ok(jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/")))
    }
}
