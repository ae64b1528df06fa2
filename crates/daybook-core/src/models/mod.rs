pub mod client;
pub mod config;
pub mod entry;
pub mod project;
pub mod timer;

pub use client::Client;
pub use config::{Config, ExportConfig};
pub use entry::{EntryStatus, TimeEntry};
pub use project::Project;
pub use timer::{ActiveTimer, FinishedTimer, TimerMarker, TimerState};

use crate::{Error, Result};

/// Longest allowed client or project name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Trim a user-supplied name and check its length.
pub(crate) fn normalize_name(kind: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} name cannot be empty", kind)));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "{} name too long (max {} characters)",
            kind, MAX_NAME_LEN
        )));
    }

    Ok(trimmed.to_string())
}

/// Case-insensitive name comparison used for uniqueness checks.
pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
