/// Integration tests for database migrations
///
/// These tests require a running PostgreSQL database and skip cleanly when
/// `DATABASE_URL` isn't set.
///
/// Run with: cargo test --test db_migrations_tests -- --test-threads=1
use inkpost_shared::db::migrations::{
    drop_database, ensure_database_exists, get_migration_status, run_migrations,
};
use inkpost_shared::db::pool::{close_pool, create_pool, DatabaseConfig};
use std::env;

/// The configured database URL, or None to skip
fn test_database_url() -> Option<String> {
    match env::var("DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("DATABASE_URL not set; skipping integration test");
            None
        }
    }
}

#[tokio::test]
async fn test_ensure_database_exists() {
    let Some(db_url) = test_database_url() else {
        return;
    };

    // Succeeds whether or not the database already exists
    let result = ensure_database_exists(&db_url).await;
    assert!(
        result.is_ok(),
        "Failed to ensure database exists: {:?}",
        result.err()
    );
}

#[tokio::test]
async fn test_run_migrations() {
    let Some(db_url) = test_database_url() else {
        return;
    };

    ensure_database_exists(&db_url)
        .await
        .expect("Failed to create database");

    let config = DatabaseConfig {
        url: db_url,
        ..Default::default()
    };
    let pool = create_pool(config).await.expect("Failed to create pool");

    let result = run_migrations(&pool).await;
    assert!(result.is_ok(), "Migrations failed: {:?}", result.err());

    let status = get_migration_status(&pool)
        .await
        .expect("Failed to get migration status");
    assert!(status.applied_migrations > 0, "No migrations were applied");
    assert!(status.latest_version.is_some());

    close_pool(pool).await;
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(db_url) = test_database_url() else {
        return;
    };

    ensure_database_exists(&db_url)
        .await
        .expect("Failed to create database");

    let config = DatabaseConfig {
        url: db_url,
        ..Default::default()
    };
    let pool = create_pool(config).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("First run failed");
    let first = get_migration_status(&pool)
        .await
        .expect("Failed to get migration status");

    // A second run applies nothing new
    run_migrations(&pool).await.expect("Second run failed");
    let second = get_migration_status(&pool)
        .await
        .expect("Failed to get migration status");

    assert_eq!(first.applied_migrations, second.applied_migrations);
    assert_eq!(first.latest_version, second.latest_version);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_drop_database() {
    let Some(db_url) = test_database_url() else {
        return;
    };

    // A scratch database next to the configured one, so nothing real is lost
    let scratch_url = format!("{}_drop_scratch", db_url.trim_end_matches('/'));

    ensure_database_exists(&scratch_url)
        .await
        .expect("Failed to create scratch database");

    let result = drop_database(&scratch_url).await;
    assert!(result.is_ok(), "Failed to drop database: {:?}", result.err());

    // Dropping a database that's already gone isn't an error
    drop_database(&scratch_url)
        .await
        .expect("Dropping a missing database should be a no-op");
}

#[tokio::test]
async fn test_migrated_schema_has_expected_tables() {
    let Some(db_url) = test_database_url() else {
        return;
    };

    ensure_database_exists(&db_url)
        .await
        .expect("Failed to create database");

    let config = DatabaseConfig {
        url: db_url,
        ..Default::default()
    };
    let pool = create_pool(config).await.expect("Failed to create pool");

    run_migrations(&pool).await.expect("Migrations failed");

    for table in ["users", "sessions", "posts"] {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT FROM information_schema.tables
                WHERE table_schema = 'public'
                AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Failed to query table existence");

        assert!(exists, "Table {} should exist after migrations", table);
    }

    close_pool(pool).await;
}
