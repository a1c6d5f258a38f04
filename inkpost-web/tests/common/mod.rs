/// Common test utilities for integration tests
///
/// Shared infrastructure for exercising the full router against a real
/// database:
/// - Test context construction (pool, migrations, router)
/// - Test user and post creation
/// - Request building and response inspection helpers
///
/// Integration tests need `DATABASE_URL` pointing at a PostgreSQL
/// instance; [`TestContext::new`] returns `None` when it isn't set so the
/// suite skips cleanly on machines without one.
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use inkpost_shared::auth::password::hash_password;
use inkpost_shared::models::post::{CreatePost, Post};
use inkpost_shared::models::user::{CreateUser, User};
use inkpost_web::app::{build_router, AppState};
use inkpost_web::config::Config;
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context against the configured database
    ///
    /// Returns `None` when `DATABASE_URL` isn't set.
    pub async fn new() -> anyhow::Result<Option<Self>> {
        if std::env::var("DATABASE_URL").is_err() {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return Ok(None);
        }

        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Run migrations (path relative to Cargo.toml, not this file)
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app }))
    }

    /// Creates a user with a known password, returning both
    pub async fn create_user(&self, password: &str) -> anyhow::Result<User> {
        let username = format!("user{}", Uuid::new_v4().simple());
        let user = User::create(
            &self.db,
            CreateUser {
                username,
                password_hash: hash_password(password)?,
            },
        )
        .await?;

        Ok(user)
    }

    /// Creates a post owned by the given user
    pub async fn create_post(&self, author: &User, title: &str) -> anyhow::Result<Post> {
        let post = Post::create(
            &self.db,
            CreatePost {
                author_id: author.id,
                title: title.to_string(),
                body: "Test body".to_string(),
            },
        )
        .await?;

        Ok(post)
    }

    /// Sends a GET request, optionally with a session cookie
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.app
            .clone()
            .call(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Sends a form-encoded POST request, optionally with a session cookie
    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.app
            .clone()
            .call(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Cleans up a test user (sessions and posts cascade)
    pub async fn cleanup_user(&self, user: &User) -> anyhow::Result<()> {
        User::delete(&self.db, user.id).await?;
        Ok(())
    }
}

/// Reads a response body to a string
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Extracts the `sessionid=<token>` pair from a Set-Cookie header, in the
/// form a browser would send it back
pub fn session_cookie_from(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = set_cookie.split(';').next()?.trim();
    pair.starts_with("sessionid=").then(|| pair.to_string())
}

/// Asserts a response is a 303 redirect to the given location
pub fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(location)
    );
}
