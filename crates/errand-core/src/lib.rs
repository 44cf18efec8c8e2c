//! errand-core
//!
//! In-process background task queue for a multi-tenant application.
//!
//! Producers `enqueue` named [`Task`](domain::Task)s; a single dispatch loop
//! (`Worker::run`) executes them in FIFO order, each under a fresh
//! [`Context`](domain::Context). Failures are logged, never retried.
//!
//! # Modules
//! - **domain**: Task / Job / Context / Middleware / errors
//! - **ports**: `Worker` and `Logger` traits
//! - **app**: `BackgroundWorker` (queue + dispatch loop), builder, config
//! - **impls**: logger sinks and `SyncWorker` (runs a job inline, for tests)
//!
//! ```ignore
//! let worker = Arc::new(BackgroundWorker::builder().queue_capacity(500).build()?);
//! tokio::spawn({
//!     let worker = Arc::clone(&worker);
//!     async move { worker.run("1").await }
//! });
//!
//! worker
//!     .enqueue(Task::new("SendEmail", |ctx: Context| async move {
//!         ctx.logger().info("sending");
//!         Ok(())
//!     }))
//!     .await;
//! ```

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BackgroundWorker, WorkerBuilder, WorkerConfig};
pub use domain::{Context, ContextBuilder, Job, JobError, Middleware, Task, WorkerError};
pub use impls::SyncWorker;
pub use ports::{Logger, Worker};
