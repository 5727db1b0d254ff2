use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::configuration::DatabaseSettings;
use crate::domain::WaitlistEntry;
use crate::waitlist::StoreError;
use crate::waitlist::WaitlistStore;

/// Direct connection to the database behind the waitlist table. Schema in
/// `migrations/`; apply with `sqlx migrate run`.
pub struct PgWaitlistStore {
    pool: PgPool,
}

impl PgWaitlistStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }

    /// The pool connects lazily, so an unreachable database surfaces as a
    /// failed submission rather than a failed startup.
    pub fn from_settings(db_cfg: &DatabaseSettings) -> Self {
        Self::new(PgPoolOptions::new().connect_lazy_with(db_cfg.connection()))
    }
}

impl WaitlistStore for PgWaitlistStore {
    #[tracing::instrument(name = "INSERTing waitlist entry into db", skip_all)]
    async fn insert(
        &self,
        entry: &WaitlistEntry,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO waitlist (id, email, source, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(entry.email.as_ref())
        .bind(entry.source.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }
}

/// Only a database error can carry a SQLSTATE; io/pool errors are always
/// `Other`
fn classify(e: sqlx::Error) -> StoreError {
    let code = match &e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    };
    StoreError::from_sql_state(
        code.as_deref(),
        anyhow::Error::new(e).context("Failed to insert waitlist entry"),
    )
}
