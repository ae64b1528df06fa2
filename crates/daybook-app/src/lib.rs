//! Daybook application library
//!
//! The controller, timer engine and event plumbing behind the `daybook`
//! binary, exposed as a library for embedding and testing.

pub mod daybook;
pub mod event_manager;
pub mod events;
pub mod timer;

pub use daybook::Daybook;
pub use event_manager::EventManager;
pub use events::DaybookEvent;
pub use timer::{TimerEngine, TimerEvent, TimerEventType};
