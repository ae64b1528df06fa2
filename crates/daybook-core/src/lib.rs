pub mod clock;
pub mod error;
pub mod export;
pub mod models;
pub mod report;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use store::Store;
