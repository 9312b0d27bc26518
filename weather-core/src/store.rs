use async_trait::async_trait;
use chrono::Local;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::{fmt::Debug, str::FromStr};
use tracing::info;

use crate::{
    error::AlertResult,
    model::{NewNotification, Notification},
};

const CREATE_NOTIFICATION_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS notification (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL,
        latitude REAL NOT NULL,
        longitude REAL NOT NULL,
        condition TEXT NOT NULL,
        code INTEGER NOT NULL,
        sent_at DATETIME NOT NULL
    )
";

const CREATE_EMAIL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS notification_email_idx ON notification (email)";

/// Persistence for sent alerts. Records are append-only.
#[async_trait]
pub trait NotificationStore: Send + Sync + Debug {
    async fn insert(&self, notification: NewNotification) -> AlertResult<Notification>;

    /// Exact, case-sensitive match, in insertion order.
    async fn find_by_email(&self, email: &str) -> AlertResult<Vec<Notification>>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url` and apply the schema.
    pub async fn connect(url: &str) -> AlertResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(%url, "notification store ready");
        Ok(store)
    }

    /// Private in-memory database. Limited to one connection so every query sees the same data.
    pub async fn in_memory() -> AlertResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> AlertResult<()> {
        sqlx::query(CREATE_NOTIFICATION_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_EMAIL_INDEX).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl NotificationStore for SqliteStore {
    async fn insert(&self, n: NewNotification) -> AlertResult<Notification> {
        let sent_at = Local::now().naive_local();

        let stored = sqlx::query_as::<_, Notification>(
            "INSERT INTO notification (email, latitude, longitude, condition, code, sent_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, email, latitude, longitude, condition, code, sent_at",
        )
        .bind(&n.email)
        .bind(n.latitude)
        .bind(n.longitude)
        .bind(&n.condition)
        .bind(n.code)
        .bind(sent_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> AlertResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(
            "SELECT id, email, latitude, longitude, condition, code, sent_at
             FROM notification
             WHERE email = ?
             ORDER BY id",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
