//! SentimentSage — batch CLI
//! Runs one pipeline stage per subcommand (or all of them with `run`).
//!
//! Stages communicate only through files under the data directory.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sentiment_sage::analyze::{report, scoring, trends, DedupPolicy};
use sentiment_sage::config::Config;
use sentiment_sage::notify::daily;
use sentiment_sage::pipeline::{self, RunOptions};
use sentiment_sage::telemetry::Metrics;
use sentiment_sage::{ArtifactStore, SentimentAnalyzer};

#[derive(Parser)]
#[command(name = "sentiment-sage")]
#[command(version)]
#[command(about = "Collect Bitcoin chatter, score sentiment, aggregate trends, render reports")]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory (overrides config file and DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON log lines instead of compact text
    #[arg(long, global = true)]
    json: bool,

    /// Write Prometheus exposition text here when the run finishes
    #[arg(long, global = true)]
    metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's batches from Twitter, Reddit and news feeds
    Collect(DateArgs),
    /// Score every collected batch into sentiment_results.json
    Score(ScoreArgs),
    /// Aggregate scored items into trend_summary.json
    Trends,
    /// Render trend_summary.json into report.md
    Report,
    /// Build the daily report consumed by `notify`
    Daily(DateArgs),
    /// E-mail the daily report
    Notify(NotifyArgs),
    /// Run collect → score → trends → report → daily (→ notify)
    Run(RunArgs),
}

#[derive(Args)]
struct DateArgs {
    /// Day to stamp/read artifacts with (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args)]
struct ScoreArgs {
    /// Keep only the first item per (source, identifier)
    #[arg(long)]
    dedup: bool,
}

#[derive(Args)]
struct NotifyArgs {
    #[command(flatten)]
    date: DateArgs,
    /// Include the detailed-analysis section
    #[arg(long)]
    premium: bool,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    date: DateArgs,
    #[arg(long)]
    dedup: bool,
    /// Send the daily e-mail at the end
    #[arg(long)]
    notify: bool,
    #[arg(long)]
    premium: bool,
}

fn dedup_policy(on: bool) -> DedupPolicy {
    if on {
        DedupPolicy::ByIdentifier
    } else {
        DedupPolicy::KeepAll
    }
}

fn day(args: &DateArgs) -> NaiveDate {
    args.date.unwrap_or_else(|| Local::now().date_naive())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sentiment_sage=info,warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present; missing file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json);

    let metrics = match &cli.metrics_file {
        Some(_) => Some(Metrics::init()?),
        None => None,
    };

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(d) = &cli.data_dir {
        cfg.data_dir = d.clone();
    }
    let store = ArtifactStore::new(&cfg.data_dir);
    let analyzer = SentimentAnalyzer::new();

    match &cli.command {
        Commands::Collect(args) => {
            let out = pipeline::collect_all(&cfg, &store, day(args)).await;
            println!("Collected {} batch file(s)", out.written.len());
        }
        Commands::Score(args) => {
            let items = scoring::run(&store, &analyzer, dedup_policy(args.dedup))?;
            println!("Processed {} items for sentiment analysis.", items.len());
        }
        Commands::Trends => {
            trends::run(&store)?;
            println!("Trend summary saved.");
        }
        Commands::Report => {
            report::run(&store)?;
            println!("Report generated.");
        }
        Commands::Daily(args) => {
            let r = daily::run(&store, day(args))?;
            println!("Daily report: {}", r.sentiment_category);
        }
        Commands::Notify(args) => {
            let sent = pipeline::notify(&cfg, &store, day(&args.date), args.premium).await?;
            println!("Sent {sent} email(s)");
        }
        Commands::Run(args) => {
            let opts = RunOptions {
                dedup: dedup_policy(args.dedup),
                notify: args.notify,
                premium: args.premium,
            };
            pipeline::run_all(&cfg, &store, day(&args.date), opts).await?;
            println!("Pipeline finished.");
        }
    }

    if let (Some(m), Some(path)) = (&metrics, &cli.metrics_file) {
        m.write_to(path)?;
    }
    Ok(())
}
