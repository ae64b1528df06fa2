pub mod engine;
pub mod events;

pub use engine::TimerEngine;
pub use events::{TimerEvent, TimerEventType};
