use crate::config::Config;
use crate::handlers;
use crate::i18n::Catalog;
use crate::locale;
use crate::session::{self, SessionStore};
use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared state for all handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sessions = SessionStore::new(config.session_lifetime());
        let catalog = Catalog::new(&config.lang_path).with_fallback(config.fallback_locale);

        Self {
            config: Arc::new(config),
            sessions,
            catalog: Arc::new(catalog),
        }
    }
}

/// Build the application router.
///
/// Page routes pass through the session middleware first, then the locale
/// middleware, so their handlers can rely on both `Session` and
/// `EffectiveLocale` extensions. `/health` sits outside both.
pub fn router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(handlers::shared_props))
        .route("/language", post(handlers::store_language))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            locale::set_language,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Periodically drop idle sessions.
pub fn spawn_session_sweeper(sessions: SessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired();
            if removed > 0 {
                debug!("Purged {} expired sessions", removed);
            }
        }
    })
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config);

    info!(
        "Default locale '{}', catalog at {}",
        state.config.default_locale,
        state.catalog.root().display()
    );
    if !state.catalog.root().is_dir() {
        warn!("Catalog directory does not exist; all translation tables will be empty");
    }

    let _sweeper = spawn_session_sweeper(state.sessions.clone(), Duration::from_secs(60));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
