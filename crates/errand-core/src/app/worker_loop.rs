//! BackgroundWorker - bounded queue + a single dispatch loop.
//!
//! 1. producers `enqueue()` into a bounded mpsc channel (waits while full)
//! 2. `run()` pops tasks in FIFO order
//! 3. builds a fresh `Context`, wraps the job with the installed middleware
//! 4. runs it on its own tokio task and awaits it
//! 5. logs `Err` / panic with task, tenant and user, then moves on
//!
//! Failures are never retried or requeued.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use super::builder::WorkerBuilder;
use super::config::{DEFAULT_LOGGER_TAG, DEFAULT_QUEUE_CAPACITY, WorkerConfig};
use super::failure::{failure_message, join_failure};
use crate::domain::{
    Context, ContextBuilder, FailureScope, Job, JobFuture, Middleware, Services, Task,
    WorkerError, identity,
};
use crate::impls::TracingLogger;
use crate::ports::{Logger, Worker};

type TaskReceiver = mpsc::Receiver<Task>;

/// Scope of the context a job was last handed, shared with the dispatch loop.
type ScopeSlot = Arc<Mutex<Option<FailureScope>>>;

/// BackgroundWorker runs tasks on background, one at a time, in enqueue order.
///
/// Share it behind an `Arc`: producers call `enqueue` from anywhere while a
/// single spawned task drives `run`.
pub struct BackgroundWorker {
    logger: Arc<dyn Logger>,
    services: Arc<Services>,
    sender: mpsc::Sender<Task>,
    /// `None` while a dispatch loop owns the receiver.
    receiver: Mutex<Option<TaskReceiver>>,
    middleware: RwLock<Middleware>,
    shutdown_tx: watch::Sender<bool>,
}

impl BackgroundWorker {
    /// Worker with a 100-slot queue logging through `tracing` as "BGW".
    pub fn new() -> Self {
        Self::from_parts(
            DEFAULT_QUEUE_CAPACITY,
            Arc::new(TracingLogger::new(DEFAULT_LOGGER_TAG)),
            Arc::new(Services::new()),
            identity(),
        )
    }

    pub fn builder() -> WorkerBuilder {
        WorkerBuilder::new()
    }

    pub fn from_config(config: WorkerConfig) -> Result<Self, WorkerError> {
        WorkerBuilder::new().config(config).build()
    }

    /// `capacity` must be non-zero; [`WorkerBuilder::build`] checks it.
    pub(crate) fn from_parts(
        capacity: usize,
        logger: Arc<dyn Logger>,
        services: Arc<Services>,
        middleware: Middleware,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            logger,
            services,
            sender,
            receiver: Mutex::new(Some(receiver)),
            middleware: RwLock::new(middleware),
            shutdown_tx,
        }
    }

    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    pub fn services(&self) -> &Arc<Services> {
        &self.services
    }

    /// Ask the dispatch loop to stop.
    ///
    /// The loop finishes the job it is running and exits without draining the
    /// queue. Later calls to `run` return immediately.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    fn take_receiver(&self) -> Result<ReceiverGuard<'_>, WorkerError> {
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(WorkerError::AlreadyRunning)?;

        Ok(ReceiverGuard {
            slot: &self.receiver,
            receiver: Some(receiver),
        })
    }

    fn current_middleware(&self) -> Middleware {
        Arc::clone(&self.middleware.read().unwrap_or_else(PoisonError::into_inner))
    }

    async fn dispatch(&self, worker_id: &str, task: Task) {
        let (name, job) = task.into_parts();
        let ctx = ContextBuilder::new(worker_id, name.as_str())
            .services(Arc::clone(&self.services))
            .logger(Arc::clone(&self.logger))
            .build();
        let scope = FailureScope::of(&ctx);
        let ran_under = ScopeSlot::default();
        let middleware = self.current_middleware();
        let inner = scoped(job, Arc::clone(&ran_under));

        self.logger.debug(&format!("Dispatching task {name}."));

        // Wrapping happens inside the spawned task too, so a panicking
        // middleware surfaces as a JoinError instead of unwinding the loop.
        let result = tokio::spawn(async move { middleware(inner)(ctx).await }).await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                let scope = err.scope().unwrap_or(&scope);
                self.logger
                    .error(&failure_message(&name, scope, &err.to_string()));
            }
            Err(join_err) => {
                let ran_under = ran_under
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                let scope = ran_under.as_ref().unwrap_or(&scope);
                self.logger
                    .error(&failure_message(&name, scope, &join_failure(join_err)));
            }
        }
    }
}

impl Default for BackgroundWorker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Worker for BackgroundWorker {
    async fn run(&self, worker_id: &str) -> Result<(), WorkerError> {
        let mut receiver = self.take_receiver()?;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        self.logger.info(&format!("Starting worker {worker_id}."));

        loop {
            if *shutdown_rx.borrow_and_update() {
                break;
            }

            let task = tokio::select! {
                biased;
                _ = shutdown_rx.changed() => continue,
                task = receiver.recv() => task,
            };

            // self owns a sender, so the channel never reports closed here.
            let Some(task) = task else {
                break;
            };

            self.dispatch(worker_id, task).await;
        }

        self.logger.info(&format!("Worker {worker_id} stopped."));
        Ok(())
    }

    async fn enqueue(&self, task: Task) {
        // Cannot fail: the receiver lives in `self.receiver` or in the guard of
        // a running loop, and both are dropped only together with `self`.
        let _ = self.sender.send(task).await;
    }

    fn logger(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    fn use_middleware(&self, middleware: Middleware) {
        *self
            .middleware
            .write()
            .unwrap_or_else(PoisonError::into_inner) = middleware;
    }

    fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

/// Hands the receiver back to the worker when the loop exits (or is dropped).
struct ReceiverGuard<'a> {
    slot: &'a Mutex<Option<TaskReceiver>>,
    receiver: Option<TaskReceiver>,
}

impl ReceiverGuard<'_> {
    async fn recv(&mut self) -> Option<Task> {
        match self.receiver.as_mut() {
            Some(receiver) => receiver.recv().await,
            None => None,
        }
    }
}

impl Drop for ReceiverGuard<'_> {
    fn drop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(receiver);
        }
    }
}

/// Innermost wrapper: records the scope of the context the job actually ran
/// under (middleware may have replaced it) before the job starts, and tags
/// returned errors with it.
fn scoped(job: Job, ran_under: ScopeSlot) -> Job {
    Arc::new(move |ctx: Context| -> JobFuture {
        let scope = FailureScope::of(&ctx);
        *ran_under.lock().unwrap_or_else(PoisonError::into_inner) = Some(scope.clone());
        let run = job(ctx);
        Box::pin(async move { run.await.map_err(|err| err.in_scope(scope)) })
    })
}
