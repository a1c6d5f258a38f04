/// Application state and router builder
///
/// Defines the shared application state, the session-loading middleware,
/// and the function that assembles the axum router with all routes and
/// middleware.
///
/// # Example
///
/// ```no_run
/// use inkpost_web::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = inkpost_web::app::build_router(state);
/// # Ok(())
/// # }
/// ```
use crate::middleware::security::SecurityHeadersLayer;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use inkpost_shared::{auth::session, models::session::Session, models::user::User};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{config::Config, pages, routes};

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Whether responses should carry production-only attributes
    /// (Secure cookies, HSTS)
    pub fn production(&self) -> bool {
        self.config.server.production
    }

    /// Configured session lifetime in seconds
    pub fn session_ttl(&self) -> u64 {
        self.config.session.ttl_seconds
    }
}

/// The resolved session for the current request
///
/// Inserted into request extensions by [`session_layer`] when the request
/// carries a valid, unexpired session cookie. Handlers take
/// `Option<Extension<CurrentSession>>`; anonymous requests simply get
/// `None`.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    /// The signed-in user
    pub user: User,

    /// Hash of the session token, for targeted deletion on logout
    pub token_hash: String,
}

/// Builds the complete axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /                       # Post list (alias)
/// ├── GET  /posts                  # Post list
/// ├── GET  /health                 # Health check
/// └── /accounts/
///     ├── GET|POST /register       # Registration form / submit
///     ├── GET|POST /login          # Login form / submit
///     └── GET|POST /logout         # Logout confirmation / submit
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. Session loading (cookie → `CurrentSession` extension)
/// 2. Logging (tower-http TraceLayer)
/// 3. Security headers
pub fn build_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route(
            "/register",
            get(routes::accounts::register_form).post(routes::accounts::register),
        )
        .route(
            "/login",
            get(routes::accounts::login_form).post(routes::accounts::login),
        )
        .route(
            "/logout",
            get(routes::accounts::logout_confirm).post(routes::accounts::logout),
        );

    Router::new()
        .route("/", get(routes::posts::post_list))
        .route("/posts", get(routes::posts::post_list))
        .route("/health", get(routes::health::health_check))
        .nest("/accounts", account_routes)
        .fallback(not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(state.production()))
        .with_state(state)
}

/// Session-loading middleware
///
/// Reads the session cookie, resolves it to a user through the sessions
/// table, and inserts a [`CurrentSession`] into request extensions. This
/// never rejects: a missing, malformed, unknown or expired cookie just
/// means the request proceeds anonymously. A lookup failure is logged and
/// also treated as anonymous so a database hiccup can't lock every
/// visitor out of public pages.
async fn session_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(session::extract_session_token);

    if let Some(token) = token {
        let token_hash = session::hash_session_token(token);

        match Session::find_user(&state.db, &token_hash).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(CurrentSession { user, token_hash });
            }
            Ok(None) => {
                // Stale cookie; the browser keeps sending it until it expires
                tracing::debug!("Session cookie did not match a live session");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
            }
        }
    }

    next.run(req).await
}

/// Fallback handler for unknown paths
async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(pages::error_page(StatusCode::NOT_FOUND)),
    )
        .into_response()
}
