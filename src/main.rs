use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod error;
mod launcher;
mod menu;
mod models;
mod service;
mod store;

use service::ConnectionService;
use store::{DefaultsStore, ProfileStore};

#[derive(Parser)]
#[command(name = "ssm", version, about = "A menu-driven manager for SSH connection profiles")]
struct Cli {
    /// Directory holding connections.json and defaults.json
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => store::default_config_dir().context("Failed to resolve config directory")?,
    };
    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    setup_logging(&config_dir)?;
    debug!("using config directory {}", config_dir.display());

    let service = ConnectionService::new(
        ProfileStore::new(config_dir.join(store::CONNECTIONS_FILE)),
        DefaultsStore::new(config_dir.join(store::DEFAULTS_FILE)),
    );

    menu::run(&service)
}

// The terminal belongs to the menu and to interactive SSH sessions, so logs
// go to a file under the config directory.
fn setup_logging(config_dir: &Path) -> Result<()> {
    let log_dir = config_dir.join("logs");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!("ssm_{}.log", Local::now().format("%Y%m%d_%H%M%S")));
    let file = File::create(&log_file).context("Failed to create log file")?;

    fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::from_default_env().add_directive("ssm=debug".parse()?))
        .with_ansi(false)
        .with_writer(file)
        .init();

    Ok(())
}
