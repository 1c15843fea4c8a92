//! Library half of the `hh` binary: argument parsing, the ingest/report flow
//! and report rendering.

pub mod config;
pub mod output;
pub mod pipeline;

pub use config::{Command, Config, DbArgs, IngestArgs};
