//! Jot CLI - a terminal client for a remote note-taking service.

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jot::cli::Cli;
use jot::session;
use jot::tui;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Logs go to a file because the TUI owns stdout. The guard must
    // live until exit so buffered lines are flushed.
    let _guard = init_logging(&cli);

    tracing::info!(api_base = %cli.api_base, "starting");

    if let Err(e) = tui::run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Set up file logging under the data directory. Logging is best-effort:
/// if the directory cannot be created the app runs without logs.
fn init_logging(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(session::default_data_dir)
        .join("logs");
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(dir, "jot.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("jot=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
