use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use configuration::{ConfigArgs, Settings};
use database::{connect, run_migrations, DbRepository};
use services::{AnalyticsParams, AnalyticsService, TransactionService};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

/// The main entry point for the Tally finance tracker.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = configuration::load_settings(&cli.config.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.config.display()))?;

    // The guard flushes the rolling log file on drop, so it lives until exit.
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, settings).await,
        Commands::ExportAnalytics(args) => handle_export(args, settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Records income and expenses and reports grouped statistics over them.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API until Ctrl-C.
    Serve(ServeArgs),
    /// Write the analytics report for a date range as CSV.
    ExportAnalytics(ExportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host`.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port`.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct ExportArgs {
    /// First day of the range (format: YYYY-MM-DD).
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the range, inclusive (format: YYYY-MM-DD).
    #[arg(long)]
    to: NaiveDate,

    /// day, month or year.
    #[arg(long, default_value = "day")]
    group_by: String,

    /// type or category.
    #[arg(long, default_value = "type")]
    split_by: String,

    /// sum, avg, count, median, percentile90 or group_key.
    #[arg(long, default_value = "")]
    sort_by: String,

    /// asc or desc.
    #[arg(long, default_value = "desc")]
    sort_dir: String,

    /// Destination file; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Wiring
// ==============================================================================

/// Connects, migrates and returns the repository shared by both services.
async fn open_repository(settings: &Settings) -> anyhow::Result<Arc<DbRepository>> {
    let db_pool = connect(&settings.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&db_pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(Arc::new(DbRepository::new(db_pool, settings.retry.clone())))
}

async fn handle_serve(args: ServeArgs, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    let addr: SocketAddr = settings
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", settings.bind_address()))?;

    let repo = open_repository(&settings).await?;
    let state = AppState::new(
        TransactionService::new(repo.clone()),
        AnalyticsService::new(repo),
    );

    web_server::run_server(addr, state).await
}

async fn handle_export(args: ExportArgs, settings: Settings) -> anyhow::Result<()> {
    let from = args.from.and_time(NaiveTime::MIN).and_utc();
    let to = args
        .to
        .and_hms_nano_opt(23, 59, 59, 999_999_999)
        .context("Invalid --to date")?
        .and_utc();

    let params = AnalyticsParams {
        group_by: args.group_by,
        split_by: args.split_by,
        sort_by: args.sort_by,
        sort_dir: args.sort_dir,
    };

    let repo = open_repository(&settings).await?;
    let service = AnalyticsService::new(repo);
    let body = service.export_csv(from, to, &params).await?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = body.len(), "Analytics CSV written.");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
