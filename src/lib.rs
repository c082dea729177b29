pub mod cli;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod forms;
pub mod identity;
pub mod records;
pub mod screen;
pub mod settings;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod testing;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use cli::Cli;
use db::Database;
use settings::SettingsStore;

pub struct AppState {
    pub db: Database,
    pub settings: SettingsStore,
}

impl AppState {
    /// Opens (and migrates) the database and settings under `data_dir`.
    pub fn open(data_dir: &std::path::Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let db_path = data_dir.join("carelog.sqlite3");
        let database = Database::new(db_path)?;
        let settings_store = SettingsStore::in_dir(data_dir)?;

        Ok(Self {
            db: database,
            settings: settings_store,
        })
    }
}

fn ask(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let data_dir = settings::data_dir();
    log::info!("carelog starting with data in {}", data_dir.display());
    let state = AppState::open(&data_dir)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let now = Local::now();
    let output = runtime.block_on(cli::commands::execute(
        &state,
        cli.owner,
        cli.command,
        &now,
        ask,
    ))?;
    print!("{output}");
    Ok(())
}
