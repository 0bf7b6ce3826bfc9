use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{postgres::PgConnectOptions, PgPool};

pub mod model;

fn make_pg_connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.database)
}

// 書き込みの衝突として扱う PostgreSQL のエラーコード
const SERIALIZATION_FAILURE: &str = "40001";
const EXCLUSION_VIOLATION: &str = "23P01";
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct ConnectionPool(PgPool);

impl ConnectionPool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &PgPool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Postgres>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }

    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(self.inner_ref())
            .await
            .map_err(|e| AppError::SpecificOperationError(e.into()))
    }
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> ConnectionPool {
    ConnectionPool(PgPool::connect_lazy_with(make_pg_connect_options(cfg)))
}

/// Maps store errors raised by a write. Constraint and serialization failures
/// become `Conflict`, everything else stays an internal error.
pub(crate) fn map_write_error(e: sqlx::Error) -> AppError {
    match conflict_message(&e) {
        Some(message) => AppError::Conflict(message.into()),
        None => AppError::SpecificOperationError(e),
    }
}

pub(crate) fn map_commit_error(e: sqlx::Error) -> AppError {
    match conflict_message(&e) {
        Some(message) => AppError::Conflict(message.into()),
        None => AppError::TransactionError(e),
    }
}

fn conflict_message(e: &sqlx::Error) -> Option<&'static str> {
    let code = e.as_database_error()?.code()?;
    match code.as_ref() {
        EXCLUSION_VIOLATION => Some("slot already reserved for that window"),
        SERIALIZATION_FAILURE => Some("the record was changed concurrently, please retry"),
        UNIQUE_VIOLATION => Some("a record with the same unique value already exists"),
        FOREIGN_KEY_VIOLATION => Some("the record is still referenced by other records"),
        _ => None,
    }
}
