//! shotty - main entry point
//!
//! Parses the command line, resolves settings, connects to EC2 and hands the
//! resolved action to the command layer.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use shotty::cli::Cli;
use shotty::{AwsProvider, Settings, dispatch};

/// Initialize the logger. `RUST_LOG` wins over the `-v` level.
fn init_logger(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logger(cli.log_level());
    info!("shotty starting up");

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Defaults, then the settings file, then CLI flags.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => {
            debug!("Loading settings from {:?}", path);
            Settings::load_from_file(path)?
        }
        None => Settings::default(),
    };
    settings.apply_overrides(&cli.overrides());
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

/// Returns `Ok(false)` when the command finished but some instances failed.
fn run(cli: &Cli) -> Result<bool> {
    let settings = load_settings(cli)?;
    debug!(?settings, "settings resolved");

    let provider = AwsProvider::connect(&settings.profile, settings.region.as_deref())
        .context("failed to set up the EC2 client")?;

    let action = cli.command.action();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = dispatch(&action, &provider, &settings, &mut out)?;
    out.flush()?;

    if !outcome.is_success() {
        eprintln!(
            "✗ {} of {} instances failed",
            outcome.failures.len(),
            outcome.processed
        );
    }
    Ok(outcome.is_success())
}
