//! Console rendering of the reports and the ingestion summary.
//!
//! Reports go to the given writer (stdout in the binary); the ingestion
//! summary goes to the log.

use std::io::Write;

use hh_core::{CompanyVacancyCount, IngestSummary, ReportStore, VacancyView};
use tracing::{error, info, warn};

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────";

/// Human-readable salary range.
pub fn format_salary(salary_from: Option<i32>, salary_to: Option<i32>) -> String {
    match (salary_from, salary_to) {
        (Some(from), Some(to)) => format!("{}-{} RUB", from, to),
        (Some(from), None) => format!("from {} RUB", from),
        (None, Some(to)) => format!("up to {} RUB", to),
        (None, None) => "not specified".to_string(),
    }
}

pub fn write_vacancy_counts(out: &mut impl Write, rows: &[CompanyVacancyCount]) -> std::io::Result<()> {
    if rows.is_empty() {
        writeln!(out, "   (no employers stored)")?;
    }
    for row in rows {
        writeln!(out, "   {}: {} vacancies", row.company_name, row.vacancy_count)?;
    }
    Ok(())
}

pub fn write_vacancies(out: &mut impl Write, vacancies: &[VacancyView]) -> std::io::Result<()> {
    if vacancies.is_empty() {
        writeln!(out, "   (none)")?;
    }
    for v in vacancies {
        writeln!(out, "   {} - {}", v.company_name, v.title)?;
        writeln!(out, "   Salary: {}", format_salary(v.salary_from, v.salary_to))?;
        writeln!(out, "   URL: {}", v.url)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Runs the five report queries and writes one section per query.
///
/// Each query reads the data as it is at the time of the call.
pub async fn print_reports<R: ReportStore>(
    store: &R,
    keyword: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "\nData analysis:")?;

    writeln!(out, "1. Vacancies per employer:")?;
    let counts = store.companies_with_vacancy_counts().await?;
    write_vacancy_counts(out, &counts)?;

    let average = store.average_salary().await?;
    writeln!(out, "\n2. Average salary: {:.2} RUB", average)?;

    writeln!(out, "\n3. Vacancies paying above average:")?;
    let above = store.vacancies_above_average_salary().await?;
    write_vacancies(out, &above)?;

    writeln!(out, "\n4. Vacancies matching '{}':", keyword)?;
    let matching = store.vacancies_matching_keyword(keyword).await?;
    write_vacancies(out, &matching)?;

    writeln!(out, "\n5. All vacancies:")?;
    let all = store.all_vacancies().await?;
    write_vacancies(out, &all)?;

    out.flush()?;
    Ok(())
}

/// Print a summary of an ingestion run.
pub fn print_ingest_summary(summary: &IngestSummary) {
    info!("");
    info!("{}", RULE_HEAVY);
    info!("INGESTION COMPLETE");
    info!("{}", RULE_HEAVY);
    info!("  Employers processed: {}", summary.attempted());
    info!("  Successful:          {}", summary.successful_count());
    info!("  Failed:              {}", summary.failed_count());
    info!("  Vacancies stored:    {}", summary.total_vacancies());

    if summary.failed_count() > 0 {
        info!("{}", RULE_LIGHT);
        info!("Failed employers:");
        for result in summary.failures() {
            let label = result
                .employer_name
                .clone()
                .unwrap_or_else(|| result.employer_id.to_string());
            if let Some(err) = &result.error {
                error!("  - {}: {}", label, err);
            }
        }
    }
    if summary.is_aborted() {
        warn!(
            "  Skipped after abort: {:?} (use --continue-on-error to process them anyway)",
            summary.skipped
        );
    }
    info!("{}", RULE_HEAVY);
}
