//! Impls - logger sinks and the synchronous test worker.

pub mod logger;
pub mod sync_worker;

pub use self::logger::{LogEntry, MemoryLogger, NoopLogger, TracingLogger};
pub use self::sync_worker::SyncWorker;
