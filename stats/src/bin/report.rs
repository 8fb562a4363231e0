use chrono::Utc;
use clap::Parser;

use database::{init_schema, SqliteStore, StoreConfig};
use stats::{Period, StatsService};

#[derive(Parser, Debug)]
struct Params {
    /// SQLite database path. Falls back to DATABASE_URL, then the config
    /// file, then an in-memory store.
    #[arg(short, long)]
    database: Option<String>,

    /// Optional yaml config file with a `database` entry.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Society to report on.
    #[arg(short, long)]
    society: i64,

    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    month: Option<u32>,
    #[arg(long)]
    week: Option<u32>,
    #[arg(long)]
    day: Option<u32>,

    /// Print the available drill-down periods instead of the statistics.
    #[arg(long)]
    available: bool,
}

#[derive(Debug, serde::Deserialize)]
struct ReportConfig {
    database: Option<String>,
}

fn selected_period(args: &Params) -> Period {
    match (args.year, args.month, args.week, args.day) {
        (Some(year), Some(month), _, Some(day)) => Period::Day(year, month, day),
        (Some(year), _, Some(week), _) => Period::Week(year, week),
        (Some(year), Some(month), _, _) => Period::Month(year, month),
        (Some(year), _, _, _) => Period::Year(year),
        _ => Period::All,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let yaml_url = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str::<ReportConfig>(&raw)?.database
        }
        None => None,
    };

    let config = StoreConfig::from_cli_or_env_or_yaml(args.database.clone(), yaml_url);
    let pool = config.create_pool().await?;
    init_schema(&pool).await?;
    let service = StatsService::new(SqliteStore::new(pool));

    if args.available {
        let periods = service
            .available_periods(args.society, args.year, args.month)
            .await?;
        println!("{}", serde_json::to_string_pretty(&periods)?);
        return Ok(());
    }

    let window = selected_period(&args)
        .resolve(Utc::now())
        .ok_or("selected period is not a valid calendar date")?;
    let summary = service.summary(args.society, &window).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
