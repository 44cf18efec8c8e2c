//! WorkerBuilder - wiring for a [`BackgroundWorker`].
//!
//! Capacity is validated in `build()` so a misconfigured worker fails at
//! startup instead of on the first enqueue.

use std::sync::Arc;

use super::config::WorkerConfig;
use super::worker_loop::BackgroundWorker;
use crate::domain::{Middleware, Services, WorkerError, identity};
use crate::impls::TracingLogger;
use crate::ports::Logger;

/// WorkerBuilder collects capacity, logger, services and the initial
/// middleware, then validates them in [`build`](Self::build).
///
/// # Example
/// ```ignore
/// let worker = BackgroundWorker::builder()
///     .queue_capacity(500)
///     .services(Arc::new(services))
///     .middleware(chain([with_transaction(), with_tenant()]))
///     .build()?;
/// ```
pub struct WorkerBuilder {
    config: WorkerConfig,
    logger: Option<Arc<dyn Logger>>,
    services: Arc<Services>,
    middleware: Middleware,
}

impl WorkerBuilder {
    pub fn new() -> Self {
        Self {
            config: WorkerConfig::default(),
            logger: None,
            services: Arc::new(Services::new()),
            middleware: identity(),
        }
    }

    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Tag for the default [`TracingLogger`]. Ignored when [`logger`](Self::logger) is set.
    pub fn logger_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.logger_tag = tag.into();
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Registry handed to every context the loop builds.
    pub fn services(mut self, services: Arc<Services>) -> Self {
        self.services = services;
        self
    }

    /// Initial middleware; same slot as [`Worker::use_middleware`](crate::ports::Worker::use_middleware).
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware = middleware;
        self
    }

    /// # Errors
    /// - [`WorkerError::InvalidCapacity`] when the queue capacity is zero
    pub fn build(self) -> Result<BackgroundWorker, WorkerError> {
        self.config.validate()?;

        let logger: Arc<dyn Logger> = match self.logger {
            Some(logger) => logger,
            None => Arc::new(TracingLogger::new(self.config.logger_tag.clone())),
        };

        Ok(BackgroundWorker::from_parts(
            self.config.queue_capacity,
            logger,
            self.services,
            self.middleware,
        ))
    }
}

impl Default for WorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::MemoryLogger;
    use crate::ports::Worker;

    #[test]
    fn build_uses_defaults() {
        let worker = WorkerBuilder::new().build().unwrap();
        assert_eq!(worker.capacity(), 100);
        assert!(worker.is_empty());
    }

    #[test]
    fn build_rejects_zero_capacity() {
        let result = WorkerBuilder::new().queue_capacity(0).build();
        assert!(matches!(result, Err(WorkerError::InvalidCapacity)));
    }

    #[test]
    fn build_applies_config_and_logger() {
        let logger = Arc::new(MemoryLogger::new());
        let worker = WorkerBuilder::new()
            .config(WorkerConfig {
                queue_capacity: 3,
                logger_tag: "mailer".into(),
            })
            .logger(logger.clone())
            .services(Arc::new(Services::new().with("smtp://localhost")))
            .build()
            .unwrap();

        assert_eq!(worker.capacity(), 3);
        assert!(worker.services().contains::<&'static str>());

        worker.logger().info("hello");
        assert!(logger.contains("hello"));
    }
}
