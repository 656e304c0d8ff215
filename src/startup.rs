use crate::components::session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::config::Config;
use crate::error::{other_error, Error};
use crate::shutdown;
use crate::web::{router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Redis when configured and reachable, otherwise in-memory
pub async fn build_session_store(config: &Config) -> Arc<dyn SessionStore> {
    if let Some(redis_url) = &config.redis_url {
        match RedisSessionStore::connect(redis_url, config.session_ttl_minutes).await {
            Ok(store) => {
                info!("Connected to Redis successfully");
                return Arc::new(store);
            }
            Err(e) => {
                error!("Failed to connect to Redis: {}", e);
            }
        }
    }

    info!("Using in-memory session store");
    Arc::new(InMemorySessionStore::new(config.session_ttl_minutes))
}

/// Start the web server and run until a shutdown signal arrives
pub async fn serve(config: Config) -> miette::Result<()> {
    rust_i18n::set_locale(&config.locale);
    info!("Setting locale to {}", config.locale);

    if config.microsoft.is_some() {
        info!("Microsoft sign-in enabled");
    }

    let addr = SocketAddr::new(config.bind_address, config.port);
    let store = build_session_store(&config).await;
    let state = AppState::new(config, store)?;
    let app = router(state);

    info!("Server is running on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(Error::from)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
