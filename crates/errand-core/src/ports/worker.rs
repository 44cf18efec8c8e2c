//! Worker port - what the rest of the application sees of a background worker.

use std::sync::Arc;

use async_trait::async_trait;

use super::logger::Logger;
use crate::domain::{Middleware, Task, WorkerError};

/// Worker is a process that runs tasks.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Run the dispatch loop under `worker_id` until the worker is shut down.
    async fn run(&self, worker_id: &str) -> Result<(), WorkerError>;

    /// Submit a task. Waits while the queue is full.
    async fn enqueue(&self, task: Task);

    fn logger(&self) -> Arc<dyn Logger>;

    /// Replace the installed middleware.
    fn use_middleware(&self, middleware: Middleware);

    /// Approximate number of queued tasks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
