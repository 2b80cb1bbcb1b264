mod console;
mod logging;
mod settings;

use std::path::PathBuf;

use chrono::Utc;
use clap::{ArgAction, Args, Parser, Subcommand};
use challan_generate::{
    AppendSink, BatchScheduler, CancelToken, GenerationError, MAX_WINDOW_DAYS, RecordSynthesizer,
    SnapshotSink, SynthesisRules, SystemClock, select_renderer, synthesize_many,
};
use logging::{LoggingError, init_logging};
use settings::{SettingsError, load_live_config};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
}

#[derive(Parser, Debug)]
#[command(name = "challan", version, about = "Synthetic traffic-violation records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a fixed number of records and write snapshot files.
    Batch(BatchArgs),
    /// Generate small batches with photos on a timer.
    Live(LiveArgs),
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Number of records to generate.
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,
    /// Seed for reproducible output.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Write violations_sample.json.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    json: bool,
    /// Write violations_sample.csv.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    csv: bool,
    /// Back-dating window in days.
    #[arg(long, default_value_t = 30.0, value_parser = parse_window_days)]
    window_days: f64,
    /// Directory for the snapshot files.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct LiveArgs {
    /// Optional TOML file overriding the built-in run constants.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Batch(args) => run_batch(args),
        Command::Live(args) => run_live(args).await,
    }
}

fn run_batch(args: BatchArgs) -> Result<(), CliError> {
    init_logging(None)?;

    let rules = SynthesisRules::batch(args.window_days);
    let records = synthesize_many(args.count, args.seed, &rules, Utc::now());
    console::print_batch(&records);

    let report = SnapshotSink::in_dir(&args.out_dir, args.json, args.csv).write(&records)?;
    if let Some(path) = &report.json_path {
        println!("\nSaved JSON -> {}", path.display());
    }
    if let Some(path) = &report.csv_path {
        println!("Saved CSV  -> {}", path.display());
    }
    println!("\nDone.\n");

    Ok(())
}

async fn run_live(args: LiveArgs) -> Result<(), CliError> {
    let config = load_live_config(args.config.as_deref())?;
    config.validate()?;
    let layout = config.layout();
    layout.ensure()?;
    init_logging(Some(&layout.log_path))?;

    let schedule = config.schedule();
    let renderer = select_renderer(&layout.photos_dir, &config.photo_style());
    let sink = AppendSink::open(&layout.csv_path)?;
    let synthesizer = RecordSynthesizer::seeded(None, SynthesisRules::live());
    let mut scheduler = BatchScheduler::new(
        schedule,
        synthesizer,
        renderer,
        sink,
        layout.photos_dir.clone(),
        SystemClock::new(),
    );

    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(event = "interrupt_received");
            trigger.cancel();
        }
    });

    console::print_live_start(&schedule);
    let photos_dir = layout.photos_dir.display().to_string();
    let summary = scheduler
        .run(&cancel, |report| console::print_tick(report, &photos_dir))
        .await?;
    console::print_live_end(&summary);

    Ok(())
}

fn parse_window_days(value: &str) -> Result<f64, String> {
    let days: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if days.is_finite() && (0.0..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(format!("window must be between 0 and {MAX_WINDOW_DAYS} days"))
    }
}
