use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tasklet::cli::commands::Cli;
use tasklet::cli::handlers::{self, Workspace};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log file written next to the data file while the TUI owns the terminal.
const TUI_LOG_NAME: &str = "tasklet.log";

/// Tracing is opt-in via RUST_LOG. Invalid or huge filters are ignored.
fn env_filter() -> Option<EnvFilter> {
    std::env::var("RUST_LOG").ok().and_then(|raw| {
        let raw = raw.trim();
        if raw.is_empty() || raw.len() > 4096 {
            return None;
        }
        EnvFilter::try_new(raw).ok()
    })
}

fn init_cli_logging() {
    let filter = env_filter().unwrap_or_else(|| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// The TUI draws on stdout/stderr, so logs go to a file instead (only when
/// RUST_LOG asks for them).
fn init_tui_logging(data_file: &Path) {
    let Some(filter) = env_filter() else {
        return;
    };
    let log_path = match data_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.join(TUI_LOG_NAME),
        _ => Path::new(TUI_LOG_NAME).to_path_buf(),
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let ws = match Workspace::resolve(cli.file.as_deref(), cli.config.as_deref()) {
                Ok(ws) => ws,
                Err(e) => {
                    eprintln!("error: {}", e);
                    std::process::exit(1);
                }
            };
            init_tui_logging(&ws.data_file);
            if let Err(e) = tasklet::tui::run(ws.config, ws.data_file) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            init_cli_logging();
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
