//! First-run creation of the working database.

use hh_core::config::ADMIN_DB_NAME;
use hh_core::{AppError, DbConfig};
use sqlx::{Connection, PgConnection};

use crate::connect_options;

/// Creates the database named in `config` unless it already exists.
///
/// Connects to the server's administrative `postgres` database, looks the
/// name up in `pg_database` and issues `CREATE DATABASE` when it is missing.
/// Returns `true` if the database was created.
///
/// Two processes racing through this function may both see the database as
/// missing; the loser gets an error from `CREATE DATABASE`.
///
/// # Errors
///
/// `AppError::ConfigError` if the name is not a plain identifier,
/// `AppError::ConnectionError` if the server cannot be reached.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<bool, AppError> {
    config.validate_name()?;

    let admin = config.with_database(ADMIN_DB_NAME);
    let mut conn = PgConnection::connect_with(&connect_options(&admin))
        .await
        .map_err(|e| AppError::ConnectionError(e.to_string()))?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&config.name)
            .fetch_one(&mut conn)
            .await?;

    if !exists {
        // CREATE DATABASE takes no bind parameters; the name was validated above.
        let statement = format!("CREATE DATABASE \"{}\"", config.name);
        sqlx::query(&statement).execute(&mut conn).await?;
        tracing::info!(database = %config.name, "Created database");
    }

    conn.close().await?;
    Ok(!exists)
}
