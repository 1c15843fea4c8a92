//! Configuration types for hh-harvest components.
//!
//! Database and HTTP settings are plain structs with defaults; the CLI fills
//! them from flags and environment variables. The list of employers to ingest
//! comes from an optional `employers.toml` file, falling back to a built-in
//! list.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_DB_NAME: &str = "headhunter_project";
pub const DEFAULT_DB_USER: &str = "postgres";
pub const DEFAULT_DB_PASSWORD: &str = "";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Administrative database used to create the working database.
pub const ADMIN_DB_NAME: &str = "postgres";

/// PostgreSQL connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Pool size for each handle. The writer and the report reader each open
    /// their own handle, so one connection apiece is enough.
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DB_NAME.to_string(),
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            max_connections: 1,
        }
    }
}

impl DbConfig {
    /// Checks that the database name can be used as an unquoted-safe identifier.
    ///
    /// `CREATE DATABASE` cannot take a bind parameter, so the name is
    /// interpolated (quoted) into the statement and must be restricted to
    /// letters, digits, `_` and `$`, starting with a letter or `_`, at most
    /// 63 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use hh_core::DbConfig;
    ///
    /// let config = DbConfig::default();
    /// assert!(config.validate_name().is_ok());
    ///
    /// let bad = DbConfig { name: "x; DROP TABLE y".to_string(), ..DbConfig::default() };
    /// assert!(bad.validate_name().is_err());
    /// ```
    pub fn validate_name(&self) -> Result<(), AppError> {
        let name = self.name.as_str();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

        if !valid_start || !valid_rest || name.len() > 63 {
            return Err(AppError::ConfigError(format!(
                "Invalid database name '{}': use letters, digits and underscores (max 63 chars)",
                name
            )));
        }
        Ok(())
    }

    /// Returns a copy pointing at another database on the same server.
    pub fn with_database(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }
}

/// Default base URL of the directory API.
pub const DEFAULT_API_URL: &str = "https://api.hh.ru";

/// HTTP client configuration for the directory API.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Total attempts for a transient failure (1 disables retrying).
    pub max_retries: u32,
    pub retry_base_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            user_agent: concat!("hh-harvest/", env!("CARGO_PKG_VERSION"), " (vacancy-report)")
                .to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

// =============================================================================
// Employer list (employers.toml)
// =============================================================================

fn default_enabled() -> bool {
    true
}

/// Root structure of `employers.toml`.
///
/// # Example
///
/// ```toml
/// [[employers]]
/// id = 1740
/// name = "Yandex"
///
/// [[employers]]
/// id = 3529
/// name = "Sber"
/// enabled = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployersConfig {
    pub employers: Vec<EmployerEntry>,
}

/// One employer to ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerEntry {
    /// Employer id on hh.ru.
    pub id: i64,
    /// Label for logs; the stored name always comes from the API.
    pub name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl EmployersConfig {
    /// Ids of enabled employers, in file order, without duplicates.
    pub fn enabled_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::with_capacity(self.employers.len());
        for entry in self.employers.iter().filter(|e| e.enabled) {
            if !ids.contains(&entry.id) {
                ids.push(entry.id);
            }
        }
        ids
    }
}

const BUILTIN_EMPLOYERS: &[(i64, &str)] = &[
    (1740, "Yandex"),
    (78638, "Tinkoff"),
    (3529, "Sber"),
    (15478, "VK"),
    (84585, "Avito"),
    (2180, "Ozon"),
    (3776, "MTS"),
    (2748, "Rostelecom"),
    (3127, "MegaFon"),
    (907345, "Alfa-Bank"),
];

/// Built-in employer list used when no configuration file is present.
pub fn default_employers() -> EmployersConfig {
    EmployersConfig {
        employers: BUILTIN_EMPLOYERS
            .iter()
            .map(|(id, name)| EmployerEntry {
                id: *id,
                name: Some((*name).to_string()),
                enabled: true,
            })
            .collect(),
    }
}

pub const CONFIG_FILE_NAME: &str = "employers.toml";

/// Returns the default configuration directory: `~/.config/hh-harvest/`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hh-harvest"))
}

/// Returns the default configuration file path.
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join(CONFIG_FILE_NAME))
}

/// Load the employer list from a TOML file.
///
/// * `Ok(Some(config))` - file found and parsed
/// * `Ok(None)` - no path given and nothing at the default location
/// * `Err(e)` - an explicit path does not exist, or the file is invalid
pub fn load_employers_config(path: Option<PathBuf>) -> Result<Option<EmployersConfig>, AppError> {
    let using_default_path = path.is_none();
    let config_path = match path {
        Some(p) => p,
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    if !config_path.exists() {
        if using_default_path {
            return Ok(None);
        }
        return Err(AppError::ConfigError(format!(
            "Config file not found: {}",
            config_path.display()
        )));
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        AppError::ConfigError(format!(
            "Failed to read config file '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    let config: EmployersConfig = toml::from_str(&content).map_err(|e| {
        AppError::ConfigError(format!(
            "Invalid TOML in '{}': {}",
            config_path.display(),
            e
        ))
    })?;

    tracing::debug!(
        path = %config_path.display(),
        employers = config.employers.len(),
        "Loaded employer configuration"
    );

    Ok(Some(config))
}
