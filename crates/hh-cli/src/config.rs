use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hh_core::config::{
    DEFAULT_API_URL, DEFAULT_DB_HOST, DEFAULT_DB_NAME, DEFAULT_DB_PORT, DEFAULT_DB_USER,
};
use hh_core::{AppError, DbConfig, FailurePolicy, HttpConfig, default_employers, load_employers_config};

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "hh")]
#[command(
    author,
    version,
    about = "Collect hh.ru employers and vacancies into PostgreSQL and report on them"
)]
#[command(after_help = "Examples:
  hh setup
  hh ingest --employer 1740 --employer 3529
  hh report --keyword rust
  hh run --continue-on-error

Database settings are read from DB_NAME, DB_USER, DB_PASSWORD, DB_HOST and
DB_PORT (a .env file in the working directory is loaded first).")]
pub struct Config {
    #[command(flatten)]
    pub db: DbArgs,

    /// Base URL of the hh.ru API
    #[arg(long, env = "HH_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.api_url.clone(),
            ..HttpConfig::default()
        }
    }
}

/// PostgreSQL connection settings
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database to create and use
    #[arg(long = "db-name", env = "DB_NAME", default_value = DEFAULT_DB_NAME, global = true)]
    pub name: String,

    #[arg(long = "db-user", env = "DB_USER", default_value = DEFAULT_DB_USER, global = true)]
    pub user: String,

    #[arg(
        long = "db-password",
        env = "DB_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub password: String,

    #[arg(long = "db-host", env = "DB_HOST", default_value = DEFAULT_DB_HOST, global = true)]
    pub host: String,

    #[arg(long = "db-port", env = "DB_PORT", default_value_t = DEFAULT_DB_PORT, global = true)]
    pub port: u16,
}

impl DbArgs {
    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            name: self.name.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            port: self.port,
            ..DbConfig::default()
        }
    }
}

/// Which employers to ingest and how to treat failures
#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// Employer id on hh.ru (repeatable). Overrides the configuration file.
    #[arg(short, long = "employer", value_name = "ID")]
    pub employers: Vec<i64>,

    /// Custom path to employers.toml
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep going after an employer fails instead of stopping
    #[arg(long)]
    pub continue_on_error: bool,
}

impl IngestArgs {
    pub fn policy(&self) -> FailurePolicy {
        if self.continue_on_error {
            FailurePolicy::ContinueOnError
        } else {
            FailurePolicy::AbortOnError
        }
    }

    /// Employer ids to process, in order.
    ///
    /// `--employer` flags win; otherwise the enabled entries of the
    /// configuration file; otherwise the built-in list.
    pub fn resolve_employer_ids(&self) -> Result<Vec<i64>, AppError> {
        if !self.employers.is_empty() {
            let mut ids = Vec::with_capacity(self.employers.len());
            for id in &self.employers {
                if !ids.contains(id) {
                    ids.push(*id);
                }
            }
            return Ok(ids);
        }

        let employers = match load_employers_config(self.config.clone())? {
            Some(config) => config,
            None => default_employers(),
        };
        Ok(employers.enabled_ids())
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database and tables if they do not exist
    Setup,
    /// Fetch employers and their vacancies from hh.ru and store them
    #[command(after_help = "Examples:
  hh ingest                                  # Built-in list or ~/.config/hh-harvest/employers.toml
  hh ingest --employer 1740                  # A single employer
  hh ingest --config ./employers.toml        # Use a custom config file
  hh ingest --continue-on-error              # Do not stop at the first failing employer")]
    Ingest(IngestArgs),
    /// Print the reports over the stored data
    Report {
        /// Keyword searched in vacancy titles (case-insensitive)
        #[arg(short, long, default_value = "Python")]
        keyword: String,
    },
    /// Setup, ingest, then report
    Run {
        #[command(flatten)]
        ingest: IngestArgs,

        /// Keyword searched in vacancy titles (case-insensitive)
        #[arg(short, long, default_value = "Python")]
        keyword: String,
    },
}
