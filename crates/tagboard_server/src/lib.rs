//! HTTP server wiring for Tagboard (routes, handlers, views, and shared state).

/// HTTP error mapping for handlers.
pub mod error;
/// HTTP handlers for the board pages and posting.
pub mod handlers;
/// Session cookie middleware.
pub mod session;
/// Server-rendered HTML.
pub mod views;

pub use tagboard_core::{
    config, db, keys, models, tagger, AppError, Config, Database, DEFAULT_PORT, PAGE_SIZE,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tagboard_core::db::SessionDb;
use tagboard_core::session::SessionSigner;
use tower_http::{
    compression::CompressionLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; img-src 'self' https://*.giphy.com; style-src 'self' 'unsafe-inline'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'";

/// Session store plus the signer for its cookies.
#[derive(Clone)]
pub struct SessionState {
    pub store: Arc<SessionDb>,
    pub signer: SessionSigner,
}

/// Shared state passed to HTTP handlers. Owns every storage handle; dropping
/// the last clone closes the redb files.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
    pub sessions: Option<SessionState>,
}

impl AppState {
    /// Construct shared application state.
    ///
    /// `sessions` is used only when the config carries a session secret.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when sessions are enabled but no session
    /// store was supplied.
    pub fn new(config: Config, db: Database, sessions: Option<SessionDb>) -> Result<Self, AppError> {
        let sessions = match (config.session_secret.as_deref(), sessions) {
            (Some(secret), Some(store)) => Some(SessionState {
                store: Arc::new(store),
                signer: SessionSigner::new(secret),
            }),
            (Some(_), None) => {
                return Err(AppError::Config(
                    "Sessions are enabled but no session store was opened".to_string(),
                ))
            }
            (None, _) => None,
        };

        Ok(Self {
            db: Arc::new(db),
            config: Arc::new(config),
            sessions,
        })
    }

    /// Open every store named by `config` and build the state.
    ///
    /// # Errors
    /// Returns an error when a redb file cannot be opened.
    pub fn open(config: Config) -> Result<Self, AppError> {
        let db = Database::new(&config.db_path)?;
        let sessions = if config.sessions_enabled() {
            Some(SessionDb::open(&config.db_path)?)
        } else {
            None
        };
        Self::new(config, db, sessions)
    }
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let mut routes = Router::new()
        .route("/", get(handlers::board::home))
        .route("/tag/:tag", get(handlers::board::tag_page))
        .route("/m/:id", get(handlers::board::message_page))
        .route("/post", post(handlers::board::create_message));

    if state.sessions.is_some() {
        routes = routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::track_session,
        ));
    }

    routes
        .fallback_service(ServeDir::new(state.config.static_dir.as_str()))
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_message_size))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Returns
/// `BIND` when set and valid, otherwise `127.0.0.1:<port>`. Non-loopback
/// addresses are only honored when `allow_public_access` is set.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
