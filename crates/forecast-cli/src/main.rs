//! `forecast`: view JMA forecasts by region, cached in a local SQLite file.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use forecast::{
    AreaCode, BROWSER_USER_AGENT, ForecastCache, ForecastError, ForecastStore, InMemoryStore,
    JmaConfig, JmaProvider, NoopStore, RegionCatalog, Result, SqliteStore, today_in_japan,
};
use serde_json::json;
use tracing::{error, info};

const DEFAULT_LOG_FILTER: &str =
    "forecast=info,forecast_cli=info,forecast_jma=info,forecast_store=info";

/// JMA forecast viewer with a one-hour local cache
#[derive(Parser, Debug)]
#[command(name = "forecast", version, about)]
struct Cli {
    /// Region file with a top-level `centers` object
    #[arg(long, env = "FORECAST_REGIONS", default_value = "areas.json", global = true)]
    regions: PathBuf,

    /// SQLite cache file
    #[arg(long, env = "FORECAST_DB", default_value = "weather.db", global = true)]
    db: PathBuf,

    /// Keep records in memory for this run only
    #[arg(long, global = true)]
    no_cache: bool,

    /// Forecast endpoint base URL
    #[arg(long, env = "FORECAST_BASE_URL", global = true)]
    base_url: Option<String>,

    /// User-Agent header sent with each request
    #[arg(long, env = "FORECAST_USER_AGENT", global = true)]
    user_agent: Option<String>,

    /// Send a desktop browser User-Agent
    #[arg(long, global = true, conflicts_with = "user_agent")]
    browser_user_agent: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Area lookups in flight per region
    #[arg(long, default_value_t = 4, global = true)]
    concurrency: usize,

    /// Print JSON instead of text cards
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List regions in the region file
    Regions,
    /// Show the forecast for every area of a region
    Show {
        /// Region key
        region: String,
        /// Day to show (default: today in Japan)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show every forecast day for one area, bypassing the cache
    Outlook {
        /// Area code
        #[arg(value_parser = AreaCode::parse)]
        area: AreaCode,
    },
    /// Inspect or maintain the cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Print every stored record
    List,
    /// Delete records older than the given age
    Prune {
        #[arg(long, default_value_t = 3600)]
        max_age_secs: u64,
    },
    /// Delete every stored record
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Regions => {
            let catalog = RegionCatalog::load(&cli.regions)?;
            if cli.json {
                let regions: Vec<_> = catalog.iter().collect();
                print_json(&regions)?;
            } else {
                for region in catalog.iter() {
                    println!("{}", render::region_line(region));
                }
            }
        }
        Command::Show { region, date } => {
            let catalog = RegionCatalog::load(&cli.regions)?;
            let region = catalog.require(region)?;
            let day = date.unwrap_or_else(today_in_japan);
            let cache = build_cache(&cli)?;

            info!(region = %region.key, day = %day, "Showing region forecast");
            let results = cache.fetch_region(region, day).await;

            if cli.json {
                let entries: Vec<_> = results
                    .iter()
                    .map(|entry| match &entry.result {
                        Ok(record) => json!({ "area_code": entry.area_code, "forecast": record }),
                        Err(e) => json!({ "area_code": entry.area_code, "error": e.to_string() }),
                    })
                    .collect();
                print_json(&entries)?;
            } else {
                println!("{}", render::region_header(region, day));
                for entry in &results {
                    let card = match &entry.result {
                        Ok(record) => render::forecast_card(record),
                        Err(e) => render::error_card(&entry.area_code, e),
                    };
                    println!("{card}");
                }
            }
        }
        Command::Outlook { area } => {
            let cache = build_cache(&cli)?;
            let days = cache.outlook(area).await?;

            if cli.json {
                print_json(&days)?;
            } else {
                for record in &days {
                    println!("{}", render::forecast_card(record));
                }
            }
        }
        Command::Cache { action } => {
            let store = open_store(&cli)?;
            match action {
                CacheAction::List => {
                    let records = store.list().await?;
                    if cli.json {
                        print_json(&records)?;
                    } else {
                        for record in &records {
                            println!("{}", render::record_row(record));
                        }
                    }
                }
                CacheAction::Prune { max_age_secs } => {
                    let removed = store
                        .invalidate_stale(Duration::from_secs(*max_age_secs))
                        .await?;
                    println!("Removed {removed} stale record(s)");
                }
                CacheAction::Clear => {
                    store.clear().await?;
                    println!("Cache cleared");
                }
            }
        }
    }

    Ok(())
}

fn open_store(cli: &Cli) -> Result<Arc<dyn ForecastStore>> {
    match cli.command {
        // Outlook never reads or writes records
        Command::Outlook { .. } => Ok(Arc::new(NoopStore::new())),
        _ if cli.no_cache => Ok(Arc::new(InMemoryStore::new())),
        _ => Ok(Arc::new(SqliteStore::new(&cli.db)?)),
    }
}

fn provider_config(cli: &Cli) -> JmaConfig {
    let mut config = JmaConfig::default();
    if let Some(base_url) = &cli.base_url {
        config.base_url.clone_from(base_url);
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    config.user_agent = if cli.browser_user_agent {
        Some(BROWSER_USER_AGENT.to_string())
    } else {
        cli.user_agent.clone()
    };
    config
}

fn build_cache(cli: &Cli) -> Result<ForecastCache> {
    let provider = JmaProvider::from_config(provider_config(cli))?;
    let store = open_store(cli)?;
    Ok(ForecastCache::new(Arc::new(provider), store).with_concurrency(cli.concurrency))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ForecastError::Other(format!("JSON output: {e}")))?;
    println!("{text}");
    Ok(())
}
