use thiserror::Error;

/// Classification of failures when talking to the remote directory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Non-success HTTP status that is not worth retrying (4xx other than 429).
    Http,
    /// Rate limit exceeded (429)
    RateLimit,
    /// Server error (5xx)
    ServerError,
    /// Network/connection error
    Network,
    /// Request did not complete within the configured timeout
    Timeout,
    /// Response body was not the JSON shape we expected
    Parse,
}

/// Structured details of a failed remote request.
#[derive(Debug, Clone)]
pub struct FetchErrorDetails {
    /// The failure category
    pub kind: FetchErrorKind,
    /// Human-readable description (usually includes the URL)
    pub message: String,
    /// HTTP status code, when a response was received
    pub status_code: Option<u16>,
}

impl FetchErrorDetails {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
        }
    }

    pub fn http(status_code: u16, message: impl Into<String>) -> Self {
        let kind = match status_code {
            429 => FetchErrorKind::RateLimit,
            500..=599 => FetchErrorKind::ServerError,
            _ => FetchErrorKind::Http,
        };
        Self::new(kind, message, Some(status_code))
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Parse, message, None)
    }

    /// Whether the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            FetchErrorKind::RateLimit
                | FetchErrorKind::ServerError
                | FetchErrorKind::Network
                | FetchErrorKind::Timeout
        )
    }
}

impl std::fmt::Display for FetchErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "HTTP {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Application-wide error types.
///
/// Every fallible operation in the workspace returns `Result<_, AppError>`.
/// The first three variants form the taxonomy the pipeline reasons about:
///
/// - [`AppError::RemoteFetchError`]: network, HTTP or parse failure talking to the directory API
/// - [`AppError::IntegrityViolation`]: a write was rejected by a constraint (e.g. missing employer)
/// - [`AppError::ConnectionError`]: the database is unreachable or rejected our credentials
///
/// `sqlx::Error` converts through [`From`], which sorts driver errors into
/// those buckets and falls back to [`AppError::DatabaseError`].
///
/// # Examples
///
/// ```
/// use hh_core::error::AppError;
///
/// let err: AppError = sqlx::Error::PoolTimedOut.into();
/// assert!(matches!(err, AppError::ConnectionError(_)));
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Request to the remote directory service failed.
    #[error("Remote fetch error: {0}")]
    RemoteFetchError(FetchErrorDetails),

    /// A write violated a database constraint (foreign key, not-null, unique).
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// The database could not be reached or refused the connection.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    DatabaseError(#[source] sqlx::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration value or file is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) => {
                if db_err.is_foreign_key_violation()
                    || db_err.is_unique_violation()
                    || db_err.is_check_violation()
                    || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation)
                {
                    return AppError::IntegrityViolation(db_err.message().to_string());
                }
                // 28xxx: invalid authorization, 3D000: database does not exist
                let code = db_err.code().map(|c| c.into_owned()).unwrap_or_default();
                if code.starts_with("28") || code == "3D000" {
                    return AppError::ConnectionError(db_err.message().to_string());
                }
                AppError::DatabaseError(err)
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_) => AppError::ConnectionError(err.to_string()),
            other => AppError::DatabaseError(other),
        }
    }
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ConnectionError(msg) => format!(
                "Cannot connect to database: {}\n   Is PostgreSQL running? Check DB_HOST, DB_PORT, DB_USER and DB_PASSWORD.",
                msg
            ),
            AppError::IntegrityViolation(msg) => format!(
                "Database rejected the write: {}\n   Employers must be stored before their vacancies.",
                msg
            ),
            AppError::RemoteFetchError(details) => match details.kind {
                FetchErrorKind::RateLimit => {
                    "hh.ru rate limit reached.\n   Wait a moment and try again.".to_string()
                }
                FetchErrorKind::Timeout => format!(
                    "Request timed out: {}\n   The API may be slow or unreachable.",
                    details.message
                ),
                FetchErrorKind::Network => format!(
                    "Cannot reach hh.ru: {}\n   Check your internet connection.",
                    details.message
                ),
                FetchErrorKind::Http if details.status_code == Some(404) => format!(
                    "Not found on hh.ru: {}\n   Check the employer id.",
                    details.message
                ),
                _ => format!("API error: {}", details),
            },
            AppError::ConfigError(msg) => {
                format!("Configuration error: {}\n   Check your configuration.", msg)
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if the failed operation may succeed when repeated.
    ///
    /// # Examples
    ///
    /// ```
    /// use hh_core::error::{AppError, FetchErrorDetails};
    ///
    /// let err = AppError::RemoteFetchError(FetchErrorDetails::http(503, "unavailable"));
    /// assert!(err.is_retryable());
    ///
    /// let err = AppError::RemoteFetchError(FetchErrorDetails::http(404, "no such employer"));
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::RemoteFetchError(details) => details.is_transient(),
            _ => false,
        }
    }
}
