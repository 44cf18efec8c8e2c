use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::context::Context;
use super::errors::JobError;

/// The future returned by a [`Job`].
pub type JobFuture = Pin<Box<dyn Future<Output = Result<(), JobError>> + Send + 'static>>;

/// Job is the unit of work run on background.
///
/// A job receives the [`Context`] it runs under (by value; one context per
/// execution) and reports failure by returning `Err`.
pub type Job = Arc<dyn Fn(Context) -> JobFuture + Send + Sync + 'static>;

/// Wrap an async closure into a [`Job`].
///
/// ```ignore
/// let job = errand_core::domain::job(|ctx| async move {
///     ctx.logger().info("sending welcome email");
///     Ok(())
/// });
/// ```
pub fn job<F, Fut>(f: F) -> Job
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), JobError>> + Send + 'static,
{
    Arc::new(move |ctx: Context| -> JobFuture { Box::pin(f(ctx)) })
}

/// Task pairs a name with the job to run.
///
/// The name is only used for log correlation. It is not validated and two
/// tasks may share it.
#[derive(Clone)]
pub struct Task {
    name: String,
    job: Job,
}

impl Task {
    pub fn new<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), JobError>> + Send + 'static,
    {
        Self::from_job(name, job(f))
    }

    pub fn from_job(name: impl Into<String>, job: Job) -> Self {
        Self {
            name: name.into(),
            job,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn into_parts(self) -> (String, Job) {
        (self.name, self.job)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish_non_exhaustive()
    }
}
