//! Central event broadcasting

use tokio::sync::broadcast;

use crate::events::DaybookEvent;
use crate::timer::TimerEvent;

/// Fans events out to anyone listening: the CLI's notifier, tests, a UI.
pub struct EventManager {
    event_tx: broadcast::Sender<DaybookEvent>,
}

impl EventManager {
    /// Create a new event manager with a broadcast channel
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(1000);
        Self { event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DaybookEvent> {
        self.event_tx.subscribe()
    }

    pub fn emit(&self, event: DaybookEvent) {
        // no subscribers is fine
        let _ = self.event_tx.send(event);
    }

    pub fn emit_timer(&self, event: TimerEvent) {
        self.emit(DaybookEvent::Timer(event));
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}
