/// Post model and database operations
///
/// Posts are what the site exists to show; the post list is also where
/// the account flows land after a successful submit.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     body TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Post model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID (UUID v4)
    pub id: Uuid,

    /// Author's user ID
    pub author_id: Uuid,

    /// Post title
    pub title: String,

    /// Post body text
    pub body: String,

    /// When the post was created
    pub created_at: DateTime<Utc>,
}

/// A post joined with its author's username, for list rendering
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostSummary {
    /// Unique post ID
    pub id: Uuid,

    /// Post title
    pub title: String,

    /// Post body text
    pub body: String,

    /// Author's username
    pub author_username: String,

    /// When the post was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new post
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// Author's user ID
    pub author_id: Uuid,

    /// Post title
    pub title: String,

    /// Post body text
    pub body: String,
}

impl Post {
    /// Creates a new post
    ///
    /// # Errors
    ///
    /// Returns an error if the author doesn't exist or the database
    /// connection fails
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, title, body)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, title, body, created_at
            "#,
        )
        .bind(data.author_id)
        .bind(data.title)
        .bind(data.body)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, title, body, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Lists the most recent posts with their author usernames
    ///
    /// Ordered newest first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<PostSummary>, sqlx::Error> {
        let posts = sqlx::query_as::<_, PostSummary>(
            r#"
            SELECT p.id, p.title, p.body, u.username AS author_username, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Deletes a post by ID
    ///
    /// # Returns
    ///
    /// True if the post was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_struct() {
        let data = CreatePost {
            author_id: Uuid::new_v4(),
            title: "First post".to_string(),
            body: "Hello".to_string(),
        };

        assert_eq!(data.title, "First post");
    }

    // Integration tests for database operations are in inkpost-web/tests/
}
