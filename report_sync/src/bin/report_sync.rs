use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use report_sync::areas::NATION_AREA;
use report_sync::db::{connection, migrate};
use report_sync::notify;
use report_sync::refresh::{self, RefreshOutcome, meta};
use report_sync::{store, weekly};
use shared_utils::config::load_config_path;

/// Days of national history included in the refresh broadcast.
const REFRESH_WINDOW_DAYS: i64 = 15;
/// Weeks of national history included in the refresh broadcast chart.
const REFRESH_CHART_WEEKS: i64 = 10;

#[derive(Parser)]
#[command(version, about = "Report Sync CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args)]
struct ConfigArg {
    /// Path to the TOML application config.
    #[arg(long, value_name = "FILE")]
    config: String,
}

#[derive(Subcommand)]
enum Cmd {
    /// Fetch the published datasets and refresh the store if they changed.
    Refresh(ConfigArg),
    /// Compose the weekly trend report.
    Weekly(ConfigArg),
    /// Operator inspection commands.
    Show(ShowCmd),
}

#[derive(Args)]
struct ShowCmd {
    #[command(subcommand)]
    sub: ShowSub,
}

#[derive(Subcommand)]
enum ShowSub {
    /// Latest national window.
    Nation {
        #[command(flatten)]
        config: ConfigArg,
        /// Days of history to print.
        #[arg(long, default_value_t = 7)]
        days: i64,
    },
    /// Weekly rollups for one area.
    Weekly {
        #[command(flatten)]
        config: ConfigArg,
        /// Nation constant or region name.
        #[arg(long, default_value = NATION_AREA)]
        area: String,
        /// Weeks to print, most recent first.
        #[arg(long, default_value_t = 8)]
        weeks: i64,
        /// Drop the in-progress week.
        #[arg(long)]
        complete_only: bool,
    },
    /// Refresh metadata (fingerprint, report date, lock state).
    Meta {
        #[command(flatten)]
        config: ConfigArg,
    },
}

fn open_db(database_url: &str) -> Result<diesel::SqliteConnection> {
    migrate::run_sqlite(database_url)?;
    connection::connect_sqlite(database_url)
}

async fn run_refresh(config_path: &str) -> Result<()> {
    let cfg = load_config_path(config_path)?;
    let mut conn = open_db(&cfg.database_url)?;

    let provider = dataset_ingestor::providers::provider_for(&cfg.sources)?;
    let raw = provider.fetch().await?;

    match refresh::refresh(&mut conn, &raw)? {
        RefreshOutcome::Refreshed(summary) => {
            let window = store::nation_window(&mut conn, REFRESH_WINDOW_DAYS)?;
            let trend = weekly::weekly_cases(&mut conn, NATION_AREA, REFRESH_CHART_WEEKS, true)?;
            let message = notify::compose_refresh_notification(&window, &trend);
            // Delivery to subscribers is the messaging layer's job; the
            // refresh trigger just hands over the payload.
            info!(report_date = %summary.report_date, "refresh complete");
            println!("{}", message.text);
        }
        RefreshOutcome::AlreadyUpToDate => info!("already up to date"),
        RefreshOutcome::LockedByAnotherRun => info!("refresh already in progress"),
    }
    Ok(())
}

fn run_weekly(config_path: &str) -> Result<()> {
    let cfg = load_config_path(config_path)?;
    let mut conn = open_db(&cfg.database_url)?;

    match weekly::weekly_summary(&mut conn)? {
        Some(summary) => {
            let message = notify::compose_weekly_notification(&summary);
            println!("{}", message.text);
        }
        None => info!("no data yet, nothing to report"),
    }
    Ok(())
}

fn run_show(sub: ShowSub) -> Result<()> {
    match sub {
        ShowSub::Nation { config, days } => {
            let cfg = load_config_path(&config.config)?;
            let mut conn = open_db(&cfg.database_url)?;
            for day in store::nation_window(&mut conn, days)? {
                println!(
                    "{}  new {:>7}  positive {:>8}  total {:>9}",
                    day.date.format("%Y-%m-%d"),
                    day.new_cases,
                    day.currently_positive,
                    day.total_cases
                );
            }
        }
        ShowSub::Weekly {
            config,
            area,
            weeks,
            complete_only,
        } => {
            let cfg = load_config_path(&config.config)?;
            let mut conn = open_db(&cfg.database_url)?;
            for week in weekly::weekly_cases(&mut conn, &area, weeks, !complete_only)? {
                println!(
                    "{} W{:02}  cases {:>8}  days {}  delta {}  delta² {}",
                    week.iso_year,
                    week.iso_week,
                    week.new_cases,
                    week.day_count,
                    week.delta.map_or("-".into(), |d| d.to_string()),
                    week.delta_of_delta.map_or("-".into(), |d| d.to_string()),
                );
            }
        }
        ShowSub::Meta { config } => {
            let cfg = load_config_path(&config.config)?;
            let mut conn = open_db(&cfg.database_url)?;
            match meta::get(&mut conn)? {
                Some(m) => println!(
                    "fingerprint {}\nreport date {}\nlocked      {}\nupdated at  {}",
                    m.fingerprint, m.report_date, m.locked, m.updated_at
                ),
                None => println!("no metadata (store has never been refreshed)"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Refresh(config) => run_refresh(&config.config).await,
        Cmd::Weekly(config) => run_weekly(&config.config),
        Cmd::Show(ShowCmd { sub }) => run_show(sub),
    }
}
