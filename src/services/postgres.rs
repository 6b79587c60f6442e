use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::traits::{PreferenceStore, StoreError};
use crate::models::{Preferences, Recipient, RecipientId};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

impl From<PostgresError> for StoreError {
    fn from(err: PostgresError) -> Self {
        let invalid_data = matches!(
            err,
            PostgresError::SqlxError(sqlx::Error::ColumnDecode { .. })
                | PostgresError::SqlxError(sqlx::Error::ColumnNotFound(_))
                | PostgresError::InvalidRow(_)
        );

        if invalid_data {
            StoreError::InvalidData(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

const ACTIVE_RECIPIENTS_QUERY: &str = r#"
    SELECT
        u.telegram_id,
        u.first_name,
        p.user_id IS NOT NULL AS has_preferences,
        p.min_usd_value,
        p.max_usd_value,
        p.bounties,
        p.projects,
        p.skills
    FROM telegram_users u
    LEFT JOIN user_preferences p ON p.user_id = u.id
    WHERE u.is_active = true
    ORDER BY u.id
"#;

/// Read-only PostgreSQL access to subscribed users and their preferences
///
/// The schema is owned by the bot's chat front-end; this client never writes.
pub struct PostgresPreferenceStore {
    pool: PgPool,
}

impl PostgresPreferenceStore {
    /// Create a new client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(5),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
        )
        .await
    }

    /// Load every active user, with preferences where they exist
    pub async fn active_recipients(&self) -> Result<Vec<Recipient>, PostgresError> {
        let rows = sqlx::query(ACTIVE_RECIPIENTS_QUERY)
            .fetch_all(&self.pool)
            .await?;

        let recipients = rows
            .iter()
            .map(row_to_recipient)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} active recipients", recipients.len());

        Ok(recipients)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl PreferenceStore for PostgresPreferenceStore {
    async fn fetch_active_recipients(&self) -> Result<Vec<Recipient>, StoreError> {
        Ok(self.active_recipients().await?)
    }
}

fn row_to_recipient(row: &PgRow) -> Result<Recipient, PostgresError> {
    let telegram_id: String = row.try_get("telegram_id")?;
    if telegram_id.is_empty() {
        return Err(PostgresError::InvalidRow("empty telegram_id".into()));
    }

    let has_preferences: bool = row.try_get("has_preferences")?;
    let preferences = if has_preferences {
        Some(Preferences {
            min_usd_value: normalize_bound(row.try_get("min_usd_value")?),
            max_usd_value: normalize_bound(row.try_get("max_usd_value")?),
            bounties: row.try_get::<Option<bool>, _>("bounties")?.unwrap_or(false),
            projects: row.try_get::<Option<bool>, _>("projects")?.unwrap_or(false),
            skills: row.try_get::<Option<Vec<String>>, _>("skills")?.unwrap_or_default(),
        })
    } else {
        None
    };

    Ok(Recipient {
        id: RecipientId(telegram_id),
        first_name: row.try_get("first_name")?,
        preferences,
    })
}

/// The settings UI stores 0 for a cleared bound
pub fn normalize_bound(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
