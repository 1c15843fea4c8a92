//! hh-db - PostgreSQL layer for hh-harvest.
//!
//! # Overview
//!
//! - [`Database`] - pooled connection handle with an idempotent `close`
//! - [`ensure_database_exists`] - creates the target database on first run
//! - [`ensure_schema`] - idempotent creation of `companies` and `vacancies`
//! - [`CatalogRepository`] - upserts, implements [`hh_core::CatalogStore`]
//! - [`ReportRepository`] - aggregate queries, implements [`hh_core::ReportStore`]

mod bootstrap;
mod connection;
mod migrations;
mod reports;
mod repository;

pub use bootstrap::ensure_database_exists;
pub use connection::{Database, connect_options};
pub use migrations::{MIGRATIONS, ensure_schema};
pub use reports::{ReportRepository, escape_like};
pub use repository::CatalogRepository;
