//! Active timer model
//!
//! An [`ActiveTimer`] counts seconds through ticks while the app is in the
//! foreground and catches up from the wall clock when it comes back from the
//! background. The engine that drives it lives in the app crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntryStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Suspended,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "Idle",
            TimerState::Running => "Running",
            TimerState::Suspended => "Suspended",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveTimer {
    pub project_id: i64,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
    /// Set while the app is backgrounded
    pub background_entered_at: Option<DateTime<Utc>>,
    /// Wall-clock reference this timer was built from. Kept until a tick
    /// counts time on its own, so re-persisting never drops sub-second time.
    anchor: Option<TimerMarker>,
}

/// Restart marker persisted under the `timerData` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerMarker {
    pub start_time: DateTime<Utc>,
    pub initial_elapsed: u64,
}

/// What is left of a timer once it has been paused or stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedTimer {
    pub project_id: i64,
    pub duration: u64,
    pub status: EntryStatus,
    pub finished_at: DateTime<Utc>,
}

/// Whole seconds from `from` to `to`, floored, never negative.
pub fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let millis = to.signed_duration_since(from).num_milliseconds().max(0);
    (millis / 1000) as u64
}

impl ActiveTimer {
    pub fn new(project_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            project_id,
            started_at: now,
            elapsed_seconds: 0,
            background_entered_at: None,
            anchor: Some(TimerMarker {
                start_time: now,
                initial_elapsed: 0,
            }),
        }
    }

    /// A timer started while the app is not in the foreground.
    pub fn new_suspended(project_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            background_entered_at: Some(now),
            ..Self::new(project_id, now)
        }
    }

    /// Rebuild a timer from its restart marker.
    pub fn restore(project_id: i64, marker: &TimerMarker, now: DateTime<Utc>) -> Self {
        Self {
            project_id,
            started_at: marker.start_time,
            elapsed_seconds: marker.elapsed_at(now),
            background_entered_at: None,
            anchor: Some(*marker),
        }
    }

    pub fn state(&self) -> TimerState {
        if self.background_entered_at.is_some() {
            TimerState::Suspended
        } else {
            TimerState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn is_suspended(&self) -> bool {
        self.state() == TimerState::Suspended
    }

    /// Advance one second. Ignored while suspended.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        self.anchor = None;
        true
    }

    /// Stop ticking and remember when the app left the foreground.
    pub fn suspend(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_suspended() {
            return false;
        }
        self.background_entered_at = Some(now);
        true
    }

    /// Add the time spent in the background in one lump and resume ticking.
    /// Returns the number of seconds caught up, or `None` if not suspended.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<u64> {
        let entered_at = self.background_entered_at.take()?;
        let delta = whole_seconds_between(entered_at, now);
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(delta);
        Some(delta)
    }

    /// Marker that lets a later process reconstruct this timer. Until the
    /// first tick this is the marker the timer was started or restored from.
    /// After that, while suspended the background time is not yet in
    /// `elapsed_seconds`, so the marker counts from the moment the app left
    /// the foreground.
    pub fn marker(&self, now: DateTime<Utc>) -> TimerMarker {
        if let Some(anchor) = self.anchor {
            return anchor;
        }
        TimerMarker {
            start_time: self.background_entered_at.unwrap_or(now),
            initial_elapsed: self.elapsed_seconds,
        }
    }

    /// Finalize the timer. Pending background time is reconciled first.
    pub fn finish(mut self, status: EntryStatus, now: DateTime<Utc>) -> FinishedTimer {
        self.resume(now);
        FinishedTimer {
            project_id: self.project_id,
            duration: self.elapsed_seconds,
            status,
            finished_at: now,
        }
    }
}

impl TimerMarker {
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> u64 {
        self.initial_elapsed
            .saturating_add(whole_seconds_between(self.start_time, now))
    }
}

impl FinishedTimer {
    /// Zero-second sessions never become time entries.
    pub fn has_time(&self) -> bool {
        self.duration > 0
    }
}
