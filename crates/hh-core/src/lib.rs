//! hh-core - domain types, configuration and the ingestion pipeline.
//!
//! This crate holds everything that does not talk to the network or the
//! database directly:
//!
//! - **Domain models**: [`Employer`], [`Vacancy`], [`VacancyView`], [`CompanyVacancyCount`]
//! - **Errors**: [`AppError`] with the remote / integrity / connection taxonomy
//! - **Configuration**: [`DbConfig`], [`HttpConfig`], the employer list
//! - **Traits**: [`EmployerDirectory`], [`CatalogStore`], [`ReportStore`]
//! - **Services**: [`IngestService`] with an explicit [`FailurePolicy`]
//! - **Salary arithmetic**: [`salary::midpoint`] and friends
//!
//! # Example
//!
//! ```ignore
//! use hh_core::{IngestService, TracingReporter};
//!
//! let service = IngestService::new(client, catalog);
//! let summary = service
//!     .ingest_all_with_progress(&[1740, 3529], &TracingReporter)
//!     .await;
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod progress;
pub mod salary;
pub mod summary;
pub mod traits;

// Configuration
pub use config::{
    DbConfig, EmployerEntry, EmployersConfig, HttpConfig, default_config_path, default_employers,
    load_employers_config,
};

// Error handling
pub use error::{AppError, FetchErrorDetails, FetchErrorKind};

// Domain models
pub use models::{CompanyVacancyCount, Employer, Vacancy, VacancyView};

// Pipeline
pub use ingest::{IngestService, IngestedEmployer};
pub use progress::{IngestEvent, ProgressReporter, SilentReporter, TracingReporter};
pub use summary::{EmployerIngestResult, FailurePolicy, IngestSummary};

// Traits for dependency injection
pub use traits::{CatalogStore, EmployerDirectory, ReportStore};
