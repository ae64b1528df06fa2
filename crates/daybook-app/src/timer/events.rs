//! Timer events

use chrono::{DateTime, Utc};
use daybook_core::models::entry::format_seconds;
use serde::{Deserialize, Serialize};

/// Event emitted by the timer engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimerEvent {
    pub event_type: TimerEventType,
    pub project_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// Types of timer events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEventType {
    /// Timer started
    Started,
    /// One second counted in the foreground
    Tick { elapsed_seconds: u64 },
    /// App left the foreground, ticking halted
    Suspended { elapsed_seconds: u64 },
    /// App came back; background time added in one lump
    Resumed {
        caught_up_seconds: u64,
        elapsed_seconds: u64,
    },
    /// Timer rebuilt from its restart marker
    Recovered { elapsed_seconds: u64 },
    /// Timer paused and cleared
    Paused { duration_seconds: u64 },
    /// Timer stopped and cleared
    Stopped { duration_seconds: u64 },
}

impl TimerEvent {
    pub fn new(event_type: TimerEventType, project_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            event_type,
            project_id,
            timestamp,
        }
    }

    pub fn tick(project_id: i64, elapsed_seconds: u64, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            TimerEventType::Tick { elapsed_seconds },
            project_id,
            timestamp,
        )
    }

    pub fn paused(project_id: i64, duration_seconds: u64, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            TimerEventType::Paused { duration_seconds },
            project_id,
            timestamp,
        )
    }

    pub fn stopped(project_id: i64, duration_seconds: u64, timestamp: DateTime<Utc>) -> Self {
        Self::new(
            TimerEventType::Stopped { duration_seconds },
            project_id,
            timestamp,
        )
    }

    /// User-facing message for events worth a notification
    pub fn notification(&self) -> Option<String> {
        match self.event_type {
            TimerEventType::Paused { duration_seconds } => Some(format!(
                "Timer paused after {}",
                format_seconds(duration_seconds)
            )),
            TimerEventType::Stopped { duration_seconds } => Some(format!(
                "Timer stopped after {}",
                format_seconds(duration_seconds)
            )),
            _ => None,
        }
    }
}
