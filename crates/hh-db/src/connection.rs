//! Connection handle lifecycle.

use hh_core::{AppError, DbConfig};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::{CatalogRepository, ReportRepository};

/// Builds connection options for `config` without touching the network.
pub fn connect_options(config: &DbConfig) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.name);

    if config.password.is_empty() {
        options
    } else {
        options.password(&config.password)
    }
}

/// An open handle to the working database.
///
/// Statements run in auto-commit mode; nothing here opens a transaction.
///
/// # Examples
///
/// ```no_run
/// use hh_core::DbConfig;
/// use hh_db::Database;
///
/// # async fn example() -> Result<(), hh_core::AppError> {
/// let db = Database::connect(&DbConfig::default()).await?;
/// hh_db::ensure_schema(db.pool()).await?;
/// db.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Opens a pool against `config`.
    ///
    /// # Errors
    ///
    /// `AppError::ConnectionError` if the server is unreachable, rejects the
    /// credentials or the database does not exist.
    pub async fn connect(config: &DbConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(connect_options(config))
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::DatabaseError(inner) => AppError::ConnectionError(inner.to_string()),
                other => other,
            })?;

        tracing::debug!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            "Connected to database"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Releases every connection. Calling it again is a no-op.
    pub async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            tracing::debug!("Database connection closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
