//! FXLab CLI — run event-driven or vectorized backtests over bar CSVs.
//!
//! Commands:
//! - `run` — replay the Bollinger strategy over a bar CSV (or a seeded
//!   synthetic tape) and save artifacts under a run-id directory
//! - `vector` — batch-mode backtest from a per-bar order quantity CSV
//! - `synth` — write a seeded synthetic bar CSV

mod config;
mod data_loader;
mod report;
mod synthetic;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::BacktestConfig;
use fxlab_core::{run_replay, run_vector, BarSeries, ReplayResult, Summary, VectorConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fxlab", about = "FXLab CLI — bar-replay backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the Bollinger strategy over a bar series.
    Run {
        /// Bar CSV path. Mutually exclusive with --synthetic.
        #[arg(long)]
        data: Option<PathBuf>,

        /// Replay a seeded synthetic tape instead of a CSV.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic tape.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of synthetic bars.
        #[arg(long, default_value_t = 5_000)]
        bars: usize,

        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Derive missing bid/ask columns from the close.
        #[arg(long, default_value_t = false)]
        quotes_from_close: bool,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Batch-mode backtest over a per-bar order quantity CSV.
    Vector {
        /// Bar CSV path.
        #[arg(long)]
        data: PathBuf,

        /// Order CSV path (date,time,quantity).
        #[arg(long)]
        orders: PathBuf,

        /// Proportional commission.
        #[arg(long, default_value_t = 2e-5)]
        commission: f64,

        /// Derive missing bid/ask columns from the close.
        #[arg(long, default_value_t = false)]
        quotes_from_close: bool,
    },
    /// Write a seeded synthetic bar CSV.
    Synth {
        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,

        /// Number of bars to generate.
        #[arg(long, default_value_t = 5_000)]
        bars: usize,

        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// First session date (YYYY-MM-DD).
        #[arg(long, default_value = "2016-01-04")]
        start: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            data,
            synthetic,
            seed,
            bars,
            config,
            quotes_from_close,
            output_dir,
        } => run_cmd(
            data,
            synthetic,
            seed,
            bars,
            config,
            quotes_from_close,
            output_dir,
        ),
        Commands::Vector {
            data,
            orders,
            commission,
            quotes_from_close,
        } => vector_cmd(data, orders, commission, quotes_from_close),
        Commands::Synth {
            out,
            bars,
            seed,
            start,
        } => synth_cmd(out, bars, seed, &start),
    }
}

fn run_cmd(
    data: Option<PathBuf>,
    synthetic: bool,
    seed: u64,
    bars: usize,
    config_path: Option<PathBuf>,
    quotes_from_close: bool,
    output_dir: PathBuf,
) -> Result<()> {
    if data.is_some() && synthetic {
        bail!("--data and --synthetic are mutually exclusive");
    }

    let config = match config_path {
        Some(path) => BacktestConfig::from_file(&path)?,
        None => BacktestConfig::default(),
    };

    let series = match data {
        Some(path) => data_loader::load_bars(&path, quotes_from_close)?,
        None if synthetic => {
            if bars == 0 {
                bail!("--bars must be positive");
            }
            let start = NaiveDate::from_ymd_opt(2016, 1, 4).expect("valid start date");
            synthetic::generate_bars(bars, seed, start)
        }
        None => bail!("one of --data or --synthetic is required"),
    };

    let strategy = config.strategy();
    let engine_config = config.engine_config();
    let result = run_replay(&series, &engine_config, &strategy)?;

    let start = series.bars()[0].date;
    let end = series.bars()[series.len() - 1].date;
    let run_config = config.run_config(start, end);

    print_replay_summary(&config, &series, &result);

    let run_dir = report::save_artifacts(&result, &run_config, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn vector_cmd(
    data: PathBuf,
    orders_path: PathBuf,
    commission: f64,
    quotes_from_close: bool,
) -> Result<()> {
    let series = data_loader::load_bars(&data, quotes_from_close)?;
    let orders = data_loader::load_orders(&orders_path, &series)?;
    let vector_config = VectorConfig {
        commission,
        ..VectorConfig::default()
    };
    let summary = run_vector(&series, &orders, &vector_config)?;

    println!();
    println!("=== Vectorized Backtest ===");
    println!("Bars:           {}", series.len());
    print_performance(&summary);
    Ok(())
}

fn synth_cmd(out: PathBuf, bars: usize, seed: u64, start: &str) -> Result<()> {
    if bars == 0 {
        bail!("--bars must be positive");
    }
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
    let series = synthetic::generate_bars(bars, seed, start_date);

    let mut writer = csv::Writer::from_path(&out)?;
    writer.write_record([
        "date",
        "time",
        "open",
        "high",
        "low",
        "close",
        "bid_open",
        "ask_open",
        "bid_close",
        "ask_close",
        "volume",
    ])?;
    for bar in series.bars() {
        writer.write_record([
            bar.date.to_string(),
            bar.timestamp.format("%H:%M:%S").to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.bid_open.to_string(),
            bar.ask_open.to_string(),
            bar.bid_close.to_string(),
            bar.ask_close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {} bars to {}", series.len(), out.display());
    Ok(())
}

fn print_replay_summary(config: &BacktestConfig, series: &BarSeries, result: &ReplayResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", config.backtest.symbol);
    println!(
        "Period:         {} to {}",
        series.bars()[0].date,
        series.bars()[series.len() - 1].date
    );
    println!(
        "Bars:           {} ({} warmup, {} cooldown)",
        series.len(),
        config.backtest.warmup_bars,
        config.backtest.cooldown_bars
    );
    println!("Final cash:     {:.2}", result.cash);
    println!("Final position: {:.0}", result.position);
    print_performance(&result.summary);
}

fn print_performance(summary: &Summary) {
    println!();
    println!("--- Performance ---");
    println!("Traded days:    {}", summary.traded_day_count);
    println!("Sharpe:         {:.3}", summary.sharpe);
    println!("Max Drawdown:   {:.2}%", summary.max_drawdown * 100.0);
    if let (Some(first), Some(last)) = (summary.curve.first(), summary.curve.last()) {
        println!("Curve:          {:.2} -> {:.2}", first, last);
    }
    println!();
}
