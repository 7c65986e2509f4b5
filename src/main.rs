mod config;
mod models;
mod report;
mod services;
mod sources;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use services::{Recommender, ScannerConfig, ScoringEngine, StateStore};
use sources::MeteoraDlmm;

#[derive(Parser, Debug)]
#[command(version, about = "Meteora DLMM LP scanner: ranks fresh pools and suggests strategies")]
struct Args {
    /// Freshness window in days
    #[arg(long, default_value_t = 3.0)]
    days: f64,

    /// Maximum number of recommendations
    #[arg(long, default_value_t = 15)]
    top: usize,

    /// Minimum TVL in USD
    #[arg(long, default_value_t = 0.0)]
    min_tvl: f64,

    /// Minimum 24h volume in USD
    #[arg(long = "min-vol24h", default_value_t = 0.0)]
    min_vol24h: f64,

    /// Minimum 24h fees in USD
    #[arg(long = "min-fees24h", default_value_t = 0.0)]
    min_fees24h: f64,

    /// Only pools first observed this run
    #[arg(long)]
    new_only: bool,

    /// Skip the console table, only write the JSON report
    #[arg(long)]
    json_only: bool,

    /// Re-scan continuously on a fixed interval
    #[arg(long)]
    watch: bool,

    /// Polling interval in seconds for watch mode
    #[arg(long, default_value_t = 60)]
    interval: u64,

    /// Path to config file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dlmm_scanner=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load(Path::new(&args.config))?;

    let scan = ScannerConfig {
        days: args.days,
        top: args.top,
        min_tvl: args.min_tvl,
        min_vol24h: args.min_vol24h,
        min_fees24h: args.min_fees24h,
        new_only: args.new_only,
    };

    let source = Arc::new(MeteoraDlmm::new(
        &config.source.base_url,
        config.source.timeout_secs,
    ));
    let store = StateStore::new(
        &config.storage.data_dir,
        config.storage.retention,
        config.storage.history_limit,
    );
    let recommender = Recommender::new(source, store, ScoringEngine::new(config.scoring));
    let out_dir = Path::new(&config.storage.out_dir);

    if args.watch {
        let interval = args.interval.max(1);
        println!("\n🔄 Watch mode: every {}s | days={} top={}\n", interval, scan.days, scan.top);

        // Register the handler up front so an interrupt never lands
        // mid-pipeline; the flag is only acted on between iterations.
        let shutdown = Arc::new(AtomicBool::new(false));
        {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                shutdown.store(true, Ordering::Relaxed);
            });
        }

        loop {
            let start = std::time::Instant::now();

            if let Err(e) = run_once(&recommender, &scan, out_dir, args.json_only).await {
                tracing::error!("scan failed: {}", e);
            }

            if shutdown.load(Ordering::Relaxed) {
                println!("\n🛑 Stopped watch mode");
                break;
            }

            let sleep_time = Duration::from_secs(interval).saturating_sub(start.elapsed());
            tokio::select! {
                _ = tokio::time::sleep(sleep_time) => {}
                _ = tokio::signal::ctrl_c() => {
                    println!("\n🛑 Stopped watch mode");
                    break;
                }
            }
        }
    } else {
        run_once(&recommender, &scan, out_dir, args.json_only).await?;
    }

    Ok(())
}

async fn run_once(
    recommender: &Recommender,
    scan: &ScannerConfig,
    out_dir: &Path,
    json_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let recs = recommender.run(scan).await?;
    let out_path = report::write_json(&recs, out_dir)?;

    if !json_only {
        println!("\n📊 LP Ideas (fresh <= {} days)", scan.days);
        println!("{}", report::render_table(&recs));
    }
    println!("✓ Saved JSON: {}", out_path.display());

    Ok(())
}
