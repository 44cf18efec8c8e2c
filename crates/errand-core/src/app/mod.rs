//! App - the background worker engine.
//!
//! # Components
//! - **BackgroundWorker**: bounded queue + dispatch loop (`worker_loop`)
//! - **WorkerBuilder**: wiring and startup validation
//! - **WorkerConfig**: capacity / logger tag, from defaults or environment
//! - **failure**: the log block written when a task fails

pub mod builder;
pub mod config;
pub mod failure;
pub mod worker_loop;

pub use self::builder::WorkerBuilder;
pub use self::config::WorkerConfig;
pub use self::failure::failure_message;
pub use self::worker_loop::BackgroundWorker;
