/// Session model and database operations
///
/// A row per logged-in browser. The primary key is the SHA-256 hash of the
/// cookie token (see `auth::session`); the plaintext token never touches
/// the database. Expired rows are ignored by lookups and reaped
/// opportunistically.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     token_hash VARCHAR(64) PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use inkpost_shared::auth::session::generate_session_token;
/// use inkpost_shared::models::session::{CreateSession, Session};
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let (token, token_hash) = generate_session_token();
///
/// Session::create(
///     &pool,
///     CreateSession {
///         token_hash,
///         user_id,
///         ttl_seconds: 1_209_600,
///     },
/// )
/// .await?;
/// // `token` goes into the cookie; only the hash was stored
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::User;

/// Session model representing a logged-in browser
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex digest of the session token
    pub token_hash: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the session was established
    pub created_at: DateTime<Utc>,

    /// When the session stops being honored
    pub expires_at: DateTime<Utc>,
}

/// Input for creating a new session
#[derive(Debug, Clone)]
pub struct CreateSession {
    /// SHA-256 hex digest of the session token
    pub token_hash: String,

    /// User the session belongs to
    pub user_id: Uuid,

    /// Lifetime from now, in seconds
    pub ttl_seconds: u64,
}

impl Session {
    /// Creates a new session in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the user doesn't exist or the database
    /// connection fails
    pub async fn create(pool: &PgPool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token_hash, user_id, expires_at)
            VALUES ($1, $2, NOW() + make_interval(secs => $3))
            RETURNING token_hash, user_id, created_at, expires_at
            "#,
        )
        .bind(data.token_hash)
        .bind(data.user_id)
        .bind(data.ttl_seconds as f64)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a live session by token hash
    ///
    /// Expired rows are treated as absent.
    pub async fn find_valid(pool: &PgPool, token_hash: &str) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token_hash, user_id, created_at, expires_at
            FROM sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Resolves a live session straight to its user
    ///
    /// Joined lookup used on every request carrying a session cookie.
    /// Returns None for unknown or expired sessions.
    pub async fn find_user(pool: &PgPool, token_hash: &str) -> Result<Option<User>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.username, u.password_hash, u.created_at, u.updated_at, u.last_login_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a session by token hash
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if no such session existed
    pub async fn delete(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every session belonging to a user
    ///
    /// Login rotates sessions through this before issuing a fresh token.
    ///
    /// # Returns
    ///
    /// Number of sessions deleted
    pub async fn delete_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Removes expired sessions
    ///
    /// Lookups already ignore expired rows; this reclaims the space.
    ///
    /// # Returns
    ///
    /// Number of sessions purged
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(purged = result.rows_affected(), "Purged expired sessions");
        }

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_session_struct() {
        let data = CreateSession {
            token_hash: "a".repeat(64),
            user_id: Uuid::new_v4(),
            ttl_seconds: 1_209_600,
        };

        assert_eq!(data.token_hash.len(), 64);
        assert_eq!(data.ttl_seconds, 1_209_600);
    }

    // Integration tests for database operations are in inkpost-web/tests/
}
