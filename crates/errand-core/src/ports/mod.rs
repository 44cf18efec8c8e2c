//! Ports - capabilities the engine exposes and consumes.

pub mod logger;
pub mod worker;

pub use self::logger::{Level, Logger};
pub use self::worker::Worker;
