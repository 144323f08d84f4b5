//! HTTP application shell

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::csrf::{MemoryStorage, SessionStorage, SessionTokenGuard};
use crate::error::{Error, Result};
use crate::notifications::{ExpiryScheduler, NotificationCenter, SlotLayout};

use super::{routes, websocket};

/// Application state shared across handlers.
///
/// The guard and the notification queue synchronize internally, so the
/// state itself needs no outer lock.
pub struct AppState {
    pub config: Config,
    pub guard: SessionTokenGuard,
    pub notifications: ExpiryScheduler,
    pub layout: SlotLayout,
    /// Parsed `server.cors_origins`
    pub allowed_origins: Vec<HeaderValue>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the shell state: one session storage scope, one notification queue
    pub fn new(config: Config) -> Result<Self> {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemoryStorage::new());
        let guard = SessionTokenGuard::from_config(&config.csrf, Some(storage))?;
        let center =
            NotificationCenter::with_default_duration(config.notifications.default_duration_ms);
        let layout = SlotLayout::from(&config.notifications);
        let allowed_origins = parse_origins(&config.server.cors_origins)?;

        Ok(Self {
            config,
            guard,
            notifications: ExpiryScheduler::new(center),
            layout,
            allowed_origins,
        })
    }

    pub fn center(&self) -> &NotificationCenter {
        self.notifications.center()
    }

    /// Tear down the shell: stop timers and drop queued toasts
    pub async fn teardown(&self) {
        self.notifications.shutdown();
        let dropped = self.center().clear().await;
        tracing::debug!(dropped, "Notification queue torn down");
    }
}

/// Parse configured origins. A wildcard is refused.
fn parse_origins(origins: &[String]) -> Result<Vec<HeaderValue>> {
    origins
        .iter()
        .map(|origin| {
            if origin.trim() == "*" {
                return Err(Error::Config(
                    "Wildcard CORS origin is not allowed".to_string(),
                ));
            }
            HeaderValue::from_str(origin)
                .map_err(|e| Error::Config(format!("Invalid CORS origin '{}': {}", origin, e)))
        })
        .collect()
}

/// Cross-origin access for configured front ends only; `None` keeps the
/// shell same-origin.
fn cors_layer(state: &AppState) -> Option<CorsLayer> {
    if state.allowed_origins.is_empty() {
        return None;
    }
    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(state.allowed_origins.clone()))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, state.guard.header_name().clone()]),
    )
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(config)?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state.clone(), shutdown_signal()).await?;
    state.teardown().await;

    Ok(())
}

/// Serve the shell on an already-bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: SharedState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state);

    let router = Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/csrf", get(routes::get_csrf_token))
        .route("/api/logout", post(routes::logout))
        .route(
            "/api/notifications",
            get(routes::list_notifications).post(routes::create_notification),
        )
        .route(
            "/api/notifications/{id}",
            get(routes::get_notification).delete(routes::dismiss_notification),
        )
        .route(
            "/ws",
            get(websocket::ws_handler).layer(middleware::from_fn_with_state(
                state.clone(),
                super::middleware::require_allowed_origin,
            )),
        )
        // Middleware
        .layer(middleware::from_fn_with_state(
            state.clone(),
            super::middleware::require_csrf,
        ))
        .layer(TraceLayer::new_for_http());

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins(&["http://localhost:5173".to_string()]).unwrap();
        assert_eq!(origins, vec![HeaderValue::from_static("http://localhost:5173")]);
        assert!(parse_origins(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_wildcard_origin_rejected() {
        assert!(matches!(
            parse_origins(&["*".to_string()]),
            Err(Error::Config(_))
        ));

        let mut config = Config::default();
        config.server.cors_origins = vec!["*".to_string()];
        assert!(AppState::new(config).is_err());
    }
}
