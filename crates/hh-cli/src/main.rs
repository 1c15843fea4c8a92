use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use hh_cli::output::print_reports;
use hh_cli::pipeline;
use hh_cli::{Command, Config, IngestArgs};
use hh_client::HhClient;
use hh_core::{AppError, DbConfig, HttpConfig};
use hh_db::{Database, ensure_database_exists, ensure_schema};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = Config::parse();
    let db_config = config.db.to_db_config();
    let http_config = config.http_config();

    let result = match config.command {
        Command::Setup => match setup(&db_config).await {
            Ok(db) => {
                db.close().await;
                Ok(())
            }
            Err(e) => Err(e),
        },
        Command::Ingest(args) => ingest(&db_config, http_config, &args).await,
        Command::Report { keyword } => report(&db_config, &keyword).await,
        Command::Run { ingest: args, keyword } => run(&db_config, http_config, &args, &keyword).await,
    };

    if let Err(e) = &result {
        if let Some(app_err) = e.downcast_ref::<AppError>() {
            error!("{}", app_err.user_message());
        }
    }
    result
}

/// Creates the database if needed, connects and applies the schema.
///
/// The returned handle is the writer for the rest of the run.
async fn setup(db_config: &DbConfig) -> anyhow::Result<Database> {
    info!("Preparing database '{}'...", db_config.name);
    if ensure_database_exists(db_config).await? {
        info!("Database '{}' created", db_config.name);
    }

    let db = Database::connect(db_config).await?;
    if let Err(e) = ensure_schema(db.pool()).await {
        db.close().await;
        return Err(e.into());
    }
    Ok(db)
}

async fn ingest(
    db_config: &DbConfig,
    http_config: HttpConfig,
    args: &IngestArgs,
) -> anyhow::Result<()> {
    let employer_ids = employer_ids(args)?;
    let client = HhClient::with_config(http_config)?;
    let writer = setup(db_config).await?;

    info!("Ingesting from {}", client.base_url());
    let summary = pipeline::ingest(client, &writer, &employer_ids, args.policy()).await;
    pipeline::ensure_complete(&summary)
}

fn employer_ids(args: &IngestArgs) -> anyhow::Result<Vec<i64>> {
    let employer_ids = args.resolve_employer_ids()?;
    if employer_ids.is_empty() {
        warn!("No employers to ingest. Enable some in employers.toml or pass --employer <ID>");
    } else {
        info!("{} employers to ingest", employer_ids.len());
    }
    Ok(employer_ids)
}

/// Opens a dedicated read handle, prints every report and closes the handle,
/// whether or not a query failed.
async fn report(db_config: &DbConfig, keyword: &str) -> anyhow::Result<()> {
    let reader = Database::connect(db_config)
        .await
        .context("Failed to open the report connection")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = print_reports(&reader.reports(), keyword, &mut out).await;

    reader.close().await;
    result
}

/// Setup, ingest and report. Reporting runs even when setup or ingestion
/// failed.
async fn run(
    db_config: &DbConfig,
    http_config: HttpConfig,
    args: &IngestArgs,
    keyword: &str,
) -> anyhow::Result<()> {
    let employer_ids = employer_ids(args)?;
    let client = HhClient::with_config(http_config)?;

    let writer = match setup(db_config).await {
        Ok(writer) => writer,
        Err(e) => {
            error!("Setup failed: {:#}", e);
            report(db_config, keyword).await?;
            return Err(e);
        }
    };

    let reader = match Database::connect(db_config).await {
        Ok(reader) => reader,
        Err(e) => {
            writer.close().await;
            return Err(anyhow::Error::new(e).context("Failed to open the report connection"));
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = pipeline::run(
        client,
        &writer,
        &reader.reports(),
        &employer_ids,
        args.policy(),
        keyword,
        &mut out,
    )
    .await;

    writer.close().await;
    reader.close().await;
    result
}
