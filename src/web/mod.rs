//! HTTP surface: routes, handlers and views.

mod auth;
mod handlers;
pub mod views;

use crate::components::auth::{GoogleOAuth, MicrosoftOidc};
use crate::components::google_calendar::GoogleCalendarClient;
use crate::components::portal::PortalClient;
use crate::components::session::{SessionManager, SessionSigner, SessionStore};
use crate::config::Config;
use crate::error::AppResult;
use axum::{routing::get, Router};
use reqwest::Client;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use auth::CallbackParams;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionManager,
    pub google: Arc<GoogleOAuth>,
    /// Present only when Microsoft sign-in is configured
    pub microsoft: Option<Arc<MicrosoftOidc>>,
    pub portal: Arc<PortalClient>,
    pub calendar: Arc<GoogleCalendarClient>,
}

impl AppState {
    /// Wire every component from the configuration
    pub fn new(config: Config, store: Arc<dyn SessionStore>) -> AppResult<Self> {
        let client = Client::new();

        let signer = SessionSigner::new(&config.session_secret, config.session_ttl_minutes);
        let sessions = SessionManager::new(store, signer, config.session_cookie_secure);
        let google = GoogleOAuth::new(config.google.clone(), client.clone())?;
        let microsoft = config
            .microsoft
            .clone()
            .map(|ms| Arc::new(MicrosoftOidc::new(ms, client.clone())));
        let portal = PortalClient::new(config.portal.clone(), client.clone());
        let calendar = GoogleCalendarClient::new(&config.google, client);

        Ok(Self {
            config: Arc::new(config),
            sessions,
            google: Arc::new(google),
            microsoft,
            portal: Arc::new(portal),
            calendar: Arc::new(calendar),
        })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    Router::new()
        .route("/", get(handlers::login_handler))
        .route("/login", get(handlers::login_handler))
        .route(
            "/logout",
            get(handlers::logout_handler).post(handlers::logout_handler),
        )
        .route("/health", get(handlers::health_handler))
        .route("/auth/google", get(auth::begin_google_auth))
        .route("/auth/google/callback", get(auth::complete_google_auth))
        .route("/auth/microsoft", get(auth::begin_microsoft_auth))
        .route("/auth/microsoft/callback", get(auth::complete_microsoft_auth))
        .route("/schedule", get(handlers::schedule_handler))
        // Static files for everything else
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
