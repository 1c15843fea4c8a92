//! hh-client - HTTP client for the hh.ru public API.
//!
//! [`HhClient`] fetches employer records and paginated vacancy listings and
//! converts them into [`hh_core`] domain models. It implements
//! [`hh_core::EmployerDirectory`], so the ingestion pipeline never sees
//! `reqwest` types.

pub mod hh;

pub use hh::HhClient;
