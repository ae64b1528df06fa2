//! Time entry data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i64,
    pub project_id: i64,
    /// Whole seconds worked
    pub duration: u64,
    pub date: DateTime<Utc>,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Paused,
    Completed,
}

impl TimeEntry {
    pub fn new(
        id: i64,
        project_id: i64,
        duration: u64,
        date: DateTime<Utc>,
        status: EntryStatus,
    ) -> Self {
        Self {
            id,
            project_id,
            duration,
            date,
            status,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == EntryStatus::Completed
    }

    /// Get the duration as a formatted string (HH:MM:SS)
    pub fn duration_formatted(&self) -> String {
        format_seconds(self.duration)
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration as f64 / 3600.0
    }
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Paused => "paused",
            EntryStatus::Completed => "completed",
        }
    }
}

/// Render seconds as `HH:MM:SS`.
pub fn format_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
