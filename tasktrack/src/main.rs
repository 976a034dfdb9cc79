//! `TaskTrack` host process.
//!
//! A demonstration host: it wires a fresh, empty in-memory repository to the
//! tracker and runs the daily overdue sweep until interrupted. Nothing is
//! loaded or persisted, so every sweep here finds no tasks. Real front ends
//! embed the library and supply their own
//! [`Repository`](tasktrack::repository::Repository) to [`Tracker::new`].
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/tasktrack/config.toml`).
//!
//! ```bash
//! # Sweep every day at 18:30 local time
//! cargo run --bin tasktrack -- --close-time 18:30
//!
//! # One sweep, then exit
//! cargo run --bin tasktrack -- --sweep-once
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use tasktrack::Tracker;
use tasktrack::clock::{Clock, SystemClock};
use tasktrack::closer::SweepReport;
use tasktrack::config::{AppConfig, CliArgs, Limits};
use tasktrack::repository::{InMemoryRepository, shared};
use tasktrack::scheduler::Scheduler;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config: {e}");
            AppConfig::default()
        }
    };

    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        max_projects = config.limits.max_projects,
        max_tasks = config.limits.max_tasks,
        close_time = %config.scheduler.close_time,
        "tasktrack starting"
    );

    let tracker = demo_tracker(config.limits, Arc::new(SystemClock));
    tracing::info!("using an empty in-memory store; nothing is persisted");

    if cli.sweep_once {
        let report = sweep_once(&tracker).await?;
        println!(
            "closed {} of {} tasks",
            report.closed_count(),
            report.inspected
        );
        return Ok(());
    }

    if !config.scheduler.enabled {
        tracing::info!("scheduler disabled, nothing to run");
        return Ok(());
    }

    let handle = Scheduler::new(tracker.closer(), config.scheduler.close_time).spawn();
    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, shutting down");
    handle.stop().await;

    tracing::info!("tasktrack exiting");
    Ok(())
}

/// The tracker this host runs against: an empty, process-local store.
fn demo_tracker(limits: Limits, clock: Arc<dyn Clock>) -> Tracker<InMemoryRepository> {
    Tracker::new(shared(InMemoryRepository::new()), limits, clock)
}

/// Runs one sweep on the blocking pool.
async fn sweep_once(tracker: &Tracker<InMemoryRepository>) -> io::Result<SweepReport> {
    let closer = tracker.closer();
    tokio::task::spawn_blocking(move || closer.close_overdue_tasks())
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)
}

/// Initialize logging.
///
/// Logs go to stderr unless `file_path` is given, in which case they are
/// written to that file through a non-blocking appender. The returned guard
/// must be held until exit so buffered lines are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = file_path else {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}
