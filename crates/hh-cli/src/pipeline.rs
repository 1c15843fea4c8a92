//! The `ingest` and `run` flows, independent of the concrete client and
//! database so they can be driven by in-memory stores.

use std::future::Future;
use std::io::Write;

use hh_core::{
    CatalogStore, EmployerDirectory, FailurePolicy, IngestService, IngestSummary, ReportStore,
    TracingReporter,
};
use hh_db::{CatalogRepository, Database};
use tracing::error;

use crate::output::{print_ingest_summary, print_reports};

/// The write side of a run: hands out a store and is released afterwards.
pub trait Writer: Send + Sync {
    type Store: CatalogStore;

    fn store(&self) -> Self::Store;

    /// Releases the writer. Must be safe to call more than once.
    fn close(&self) -> impl Future<Output = ()> + Send;
}

impl Writer for Database {
    type Store = CatalogRepository;

    fn store(&self) -> CatalogRepository {
        self.catalog()
    }

    async fn close(&self) {
        Database::close(self).await
    }
}

/// Ingests `employer_ids` through `writer`, closes it and logs the summary.
///
/// The writer is closed whatever the outcome.
pub async fn ingest<D, W>(
    directory: D,
    writer: &W,
    employer_ids: &[i64],
    policy: FailurePolicy,
) -> IngestSummary
where
    D: EmployerDirectory,
    W: Writer,
{
    let service = IngestService::new(directory, writer.store()).with_policy(policy);
    let summary = service
        .ingest_all_with_progress(employer_ids, &TracingReporter)
        .await;
    writer.close().await;

    print_ingest_summary(&summary);
    summary
}

/// Fails unless every requested employer was ingested.
pub fn ensure_complete(summary: &IngestSummary) -> anyhow::Result<()> {
    if summary.is_complete_success() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} employers failed, {} skipped",
            summary.failed_count(),
            summary.attempted() + summary.skipped.len(),
            summary.skipped.len()
        )
    }
}

/// Ingest, then report. The reports are written even when ingestion failed;
/// the ingestion outcome is returned afterwards.
pub async fn run<D, W, R>(
    directory: D,
    writer: &W,
    reports: &R,
    employer_ids: &[i64],
    policy: FailurePolicy,
    keyword: &str,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    D: EmployerDirectory,
    W: Writer,
    R: ReportStore,
{
    let summary = ingest(directory, writer, employer_ids, policy).await;
    let ingested = ensure_complete(&summary);
    if let Err(e) = &ingested {
        error!("Ingestion failed: {:#}", e);
    }

    print_reports(reports, keyword, out).await?;
    ingested
}
