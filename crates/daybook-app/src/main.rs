//! Daybook
//!
//! Command-line front end: every invocation opens the book, picks up any
//! running timer, performs one command and leaves the timer running in the
//! background.

use anyhow::Result;
use clap::Parser;
use daybook_app::Daybook;
use daybook_core::{
    export::CsvExporter,
    storage::{init_config_dir, init_data_dir, ConfigStorage, DaybookStorage, FileStore},
    SystemClock,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_storage = ConfigStorage::new(init_config_dir()?);
    let config = config_storage.load()?;
    let data_dir = init_data_dir(args.data_dir.clone().or_else(|| config.data_dir.clone()))?;

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.log_level.clone());
    init_logging(&data_dir, &log_level)?;
    tracing::debug!("Data directory: {}", data_dir.display());

    if let Command::Config = args.command {
        return commands::show_config(&config_storage, &config, &data_dir);
    }

    let storage = DaybookStorage::new(Arc::new(FileStore::new(data_dir)));
    let mut daybook = Daybook::open(storage, Arc::new(SystemClock))
        .await
        .with_exporter(CsvExporter::local(config.export.date_format.clone()));

    if let Some(e) = daybook.load_error() {
        eprintln!("Warning: could not read saved data ({}), starting empty", e);
    }

    let mut notifications = daybook.subscribe();
    let result = commands::run(&mut daybook, args.command, &config).await;

    // exiting the process is leaving the foreground
    daybook.enter_background().await;

    loop {
        match notifications.try_recv() {
            Ok(event) => {
                if let Some(message) = event.notification() {
                    println!("{}", message);
                }
            }
            // a long `watch` floods the channel with ticks
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    result
}

fn init_logging(data_dir: &Path, log_level: &str) -> Result<()> {
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("daybook.log"))?;

    // Only warnings reach the terminal; the log file gets everything
    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let stderr_writer = std::io::stderr.with_max_level(tracing::Level::WARN);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(stderr_writer.and(file_writer))
        .with_env_filter(log_level)
        .with_ansi(false)
        .init();

    Ok(())
}
