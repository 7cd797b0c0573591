//! Stale counter - deferred updates on a single-threaded scheduler
//!
//! Shows three counter widgets side by side. Each schedules a delayed
//! increment on mount; more can be scheduled from the keyboard. The stale
//! variant loses increments whenever several updates overlap.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use stale_counter::app::{App, AppConfig, DEFAULT_BURST};
use stale_counter::scenario;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stale-counter")]
#[command(version)]
#[command(about = "Counters whose deferred updates capture stale or live state")]
struct Args {
    /// Delay before each deferred update fires, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Overlapping updates scheduled per counter by a burst
    #[arg(long, default_value_t = DEFAULT_BURST)]
    burst: usize,

    /// Redraw interval, in milliseconds
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,

    /// Write logs to this file while the board is open
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run every variant headless, print a report and exit
    #[arg(long)]
    check: bool,

    /// Print the --check report as JSON
    #[arg(long, requires = "check")]
    json: bool,
}

impl Args {
    fn config(&self) -> Result<AppConfig> {
        let config = AppConfig::new()
            .with_delay(Duration::from_millis(self.delay_ms))
            .with_burst(self.burst)
            .with_tick_rate(Duration::from_millis(self.tick_ms))
            .validate()?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config = args.config()?;

    let local = LocalSet::new();
    if args.check {
        init_logging(None)?;
        return local.run_until(check(config, args.json)).await;
    }

    if let Some(path) = &args.log_file {
        init_logging(Some(path))?;
    }

    setup_terminal()?;
    let result = local
        .run_until(async {
            let mut app = App::new(config);
            app.run_with_crossterm().await
        })
        .await;
    restore_terminal()?;

    result
}

/// Logs to `path`, or to stderr when no path is given.
fn init_logging(path: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match path {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .init(),
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}

async fn check(config: AppConfig, json: bool) -> Result<()> {
    let report = scenario::run_all(config.burst, config.delay).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    let lost = report.failures().count();
    if lost > 0 {
        tracing::info!(lost, "runs lost updates");
    }
    Ok(())
}

fn setup_terminal() -> Result<()> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(())
}

fn restore_terminal() -> Result<()> {
    crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}
