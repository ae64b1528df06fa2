//! The timer state machine
//!
//! At most one timer is active. While the app is in the foreground a
//! once-per-second tick is the only thing that advances it; while in the
//! background ticking halts and the wall-clock gap is added in one lump on
//! return. All timestamps come from the injected [`Clock`].

use daybook_core::models::{ActiveTimer, EntryStatus, FinishedTimer, TimerMarker, TimerState};
use daybook_core::Clock;
use std::sync::Arc;

use super::events::{TimerEvent, TimerEventType};
use crate::event_manager::EventManager;

pub struct TimerEngine {
    timer: Option<ActiveTimer>,
    foreground: bool,
    clock: Arc<dyn Clock>,
    events: Arc<EventManager>,
}

impl TimerEngine {
    pub fn new(clock: Arc<dyn Clock>, events: Arc<EventManager>) -> Self {
        Self {
            timer: None,
            foreground: true,
            clock,
            events,
        }
    }

    pub fn state(&self) -> TimerState {
        self.timer
            .as_ref()
            .map_or(TimerState::Idle, ActiveTimer::state)
    }

    pub fn active(&self) -> Option<&ActiveTimer> {
        self.timer.as_ref()
    }

    pub fn active_project(&self) -> Option<i64> {
        self.timer.as_ref().map(|t| t.project_id)
    }

    pub fn elapsed(&self) -> u64 {
        self.timer.as_ref().map_or(0, |t| t.elapsed_seconds)
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// Start timing `project_id`. A timer on another project is stopped
    /// first and returned so its time can be recorded. Starting the project
    /// that is already being timed changes nothing.
    pub fn start(&mut self, project_id: i64) -> Option<FinishedTimer> {
        if self.active_project() == Some(project_id) {
            return None;
        }

        let previous = self.stop();
        let now = self.clock.now();

        self.timer = Some(if self.foreground {
            ActiveTimer::new(project_id, now)
        } else {
            ActiveTimer::new_suspended(project_id, now)
        });
        self.events
            .emit_timer(TimerEvent::new(TimerEventType::Started, project_id, now));

        previous
    }

    /// One second passed. Counts only while running in the foreground.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.foreground {
            return None;
        }

        let timer = self.timer.as_mut()?;
        if !timer.tick() {
            return None;
        }

        let elapsed = timer.elapsed_seconds;
        self.events
            .emit_timer(TimerEvent::tick(timer.project_id, elapsed, self.clock.now()));
        Some(elapsed)
    }

    /// The app left the foreground. Returns `true` when a running timer was
    /// suspended.
    pub fn enter_background(&mut self) -> bool {
        self.foreground = false;
        let now = self.clock.now();

        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if !timer.suspend(now) {
            return false;
        }

        self.events.emit_timer(TimerEvent::new(
            TimerEventType::Suspended {
                elapsed_seconds: timer.elapsed_seconds,
            },
            timer.project_id,
            now,
        ));
        true
    }

    /// The app is back. Returns the seconds added for the time away.
    pub fn enter_foreground(&mut self) -> Option<u64> {
        self.foreground = true;
        let now = self.clock.now();

        let timer = self.timer.as_mut()?;
        let caught_up = timer.resume(now)?;

        self.events.emit_timer(TimerEvent::new(
            TimerEventType::Resumed {
                caught_up_seconds: caught_up,
                elapsed_seconds: timer.elapsed_seconds,
            },
            timer.project_id,
            now,
        ));
        Some(caught_up)
    }

    pub fn pause(&mut self) -> Option<FinishedTimer> {
        self.finish(EntryStatus::Paused)
    }

    pub fn stop(&mut self) -> Option<FinishedTimer> {
        self.finish(EntryStatus::Completed)
    }

    /// Rebuild the timer a previous process left behind.
    pub fn recover(&mut self, project_id: i64, marker: &TimerMarker) {
        let now = self.clock.now();
        let mut timer = ActiveTimer::restore(project_id, marker, now);
        if !self.foreground {
            timer.suspend(now);
        }

        self.events.emit_timer(TimerEvent::new(
            TimerEventType::Recovered {
                elapsed_seconds: timer.elapsed_seconds,
            },
            project_id,
            now,
        ));
        self.timer = Some(timer);
    }

    /// What to persist so a restart can pick this timer up again.
    pub fn marker(&self) -> Option<(i64, TimerMarker)> {
        self.timer
            .as_ref()
            .map(|t| (t.project_id, t.marker(self.clock.now())))
    }

    fn finish(&mut self, status: EntryStatus) -> Option<FinishedTimer> {
        let timer = self.timer.take()?;
        let now = self.clock.now();
        let finished = timer.finish(status, now);

        let event = match status {
            EntryStatus::Paused => TimerEvent::paused(finished.project_id, finished.duration, now),
            EntryStatus::Completed => {
                TimerEvent::stopped(finished.project_id, finished.duration, now)
            }
        };
        self.events.emit_timer(event);

        Some(finished)
    }
}

/// Render elapsed seconds for a live display.
pub fn format_elapsed(seconds: u64) -> String {
    daybook_core::models::entry::format_seconds(seconds)
}
