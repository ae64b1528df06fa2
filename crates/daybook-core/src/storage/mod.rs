//! Persistence: named JSON blobs in a key-value store

pub mod config;
pub mod daybook;
pub mod file;
pub mod memory;

pub use config::ConfigStorage;
pub use daybook::{DaybookStorage, Snapshot};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::Result;
use std::path::PathBuf;

pub const CLIENTS_KEY: &str = "clients";
pub const PROJECTS_KEY: &str = "projects";
pub const TIME_ENTRIES_KEY: &str = "timeEntries";
pub const ACTIVE_TIMER_KEY: &str = "activeTimer";
pub const TIMER_DATA_KEY: &str = "timerData";

/// Last-write-wins string storage. Values are JSON documents.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub fn get_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("daybook"))
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("daybook"))
}

/// Create the data directory, preferring `override_dir` when given.
pub fn init_data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
    let data_dir = override_dir
        .or_else(get_data_dir)
        .ok_or_else(|| crate::Error::NotFound("data directory".to_string()))?;
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub fn init_config_dir() -> Result<PathBuf> {
    let config_dir =
        get_config_dir().ok_or_else(|| crate::Error::NotFound("config directory".to_string()))?;
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}
