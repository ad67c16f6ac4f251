use crate::configuration::DatabaseSettings;
use crate::domain::WaitlistEntry;
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Mutex;
use uuid::Uuid;

/// SQLSTATE reported by PostgreSQL on a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("An entry with this email already exists")]
    DuplicateEmail,
    /// The store refused the entry, carrying its own explanation.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// The table holding waitlist entries. Inserting is the only operation.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    async fn insert(&self, entry: &WaitlistEntry) -> Result<(), StoreError>;
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> Result<PgPool, anyhow::Error> {
    let options = configuration
        .connect_options()
        .context("Invalid database configuration")?;
    Ok(PgPoolOptions::new()
        .max_connections(configuration.max_connections)
        .acquire_timeout(configuration.acquire_timeout())
        .connect_lazy_with(options))
}

pub struct PostgresWaitlistStore {
    pool: PgPool,
}

impl PostgresWaitlistStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WaitlistStore for PostgresWaitlistStore {
    #[tracing::instrument(name = "Saving waitlist entry in the database", skip(self, entry))]
    async fn insert(&self, entry: &WaitlistEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO waitlist (id, name, email, phone_number, interest, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.name.as_deref())
        .bind(entry.email.as_deref())
        .bind(entry.phone_number.as_deref())
        .bind(entry.interest.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            classify_insert_error(e)
        })?;
        Ok(())
    }
}

fn classify_insert_error(error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::Database(db_error) => {
            classify_database_error(db_error.code().as_deref(), db_error.message())
        }
        other => StoreError::Unavailable(
            anyhow::Error::new(other).context("Failed to reach the waitlist store"),
        ),
    }
}

/// Splits errors raised by the database itself into duplicates and plain rejections.
pub fn classify_database_error(code: Option<&str>, message: &str) -> StoreError {
    match code {
        Some(UNIQUE_VIOLATION) => StoreError::DuplicateEmail,
        _ => StoreError::Rejected(message.to_string()),
    }
}

/// Keeps entries in process memory, enforcing the same constraints as the
/// `waitlist` table. Meant for local runs and tests.
#[derive(Default)]
pub struct InMemoryWaitlistStore {
    entries: Mutex<Vec<WaitlistEntry>>,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<WaitlistEntry> {
        self.lock().clone()
    }

    pub fn count_with_email(&self, email: &str) -> usize {
        self.lock()
            .iter()
            .filter(|e| e.email.as_deref() == Some(email))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<WaitlistEntry>> {
        // A poisoned lock still holds consistent data, pushes are atomic.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn insert(&self, entry: &WaitlistEntry) -> Result<(), StoreError> {
        let required = [
            ("name", &entry.name),
            ("email", &entry.email),
            ("phone_number", &entry.phone_number),
        ];
        if let Some((column, _)) = required.iter().find(|(_, value)| value.is_none()) {
            return Err(StoreError::Rejected(format!(
                r#"null value in column "{column}" of relation "waitlist" violates not-null constraint"#
            )));
        }

        let mut entries = self.lock();
        if entries.iter().any(|e| e.email == entry.email) {
            return Err(StoreError::DuplicateEmail);
        }
        entries.push(entry.clone());
        Ok(())
    }
}
