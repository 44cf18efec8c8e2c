//! SyncWorker - runs a job immediately, for tests.
//!
//! No queue, no middleware, no background task: `execute` builds the same
//! [`Context`](crate::domain::Context) shape the dispatch loop builds and awaits
//! the job inline, handing its result straight back.
//!
//! ```ignore
//! let mut worker = SyncWorker::new(services);
//! worker.on_tenant(Tenant::new(7, "Acme")).as_user(User::new(3, "Jon"));
//! worker.execute(send_welcome_email()).await?;
//! ```

use std::sync::Arc;

use super::logger::NoopLogger;
use crate::domain::{ContextBuilder, JobError, Services, Task, Tenant, User};

/// SyncWorker executes tasks on the caller's task under a tenant and user
/// chosen by the test.
pub struct SyncWorker {
    tenant: Option<Arc<Tenant>>,
    user: Option<Arc<User>>,
    services: Arc<Services>,
}

impl SyncWorker {
    /// Worker id reported by contexts built here.
    pub const WORKER_ID: &'static str = "0";

    pub fn new(services: Arc<Services>) -> Self {
        Self {
            tenant: None,
            user: None,
            services,
        }
    }

    pub fn on_tenant(&mut self, tenant: impl Into<Arc<Tenant>>) -> &mut Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn as_user(&mut self, user: impl Into<Arc<User>>) -> &mut Self {
        self.user = Some(user.into());
        self
    }

    pub async fn execute(&self, task: Task) -> Result<(), JobError> {
        let (name, job) = task.into_parts();
        let ctx = ContextBuilder::new(Self::WORKER_ID, name)
            .tenant(self.tenant.clone())
            .user(self.user.clone())
            .services(Arc::clone(&self.services))
            .logger(Arc::new(NoopLogger))
            .build();

        job(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Context;

    struct Mailer;

    fn describe() -> Task {
        Task::new("Describe", |ctx: Context| async move {
            let tenant = ctx.tenant().map(ToString::to_string).unwrap_or_default();
            let user = ctx.user().map(ToString::to_string).unwrap_or_default();
            Err(JobError::new(format!(
                "{}|{}|{}|{}|{}",
                ctx.worker_id(),
                ctx.task_name(),
                tenant,
                user,
                ctx.services().contains::<Mailer>()
            )))
        })
    }

    #[tokio::test]
    async fn execute_builds_context_from_builder_state() {
        let mut worker = SyncWorker::new(Arc::new(Services::new().with(Mailer)));
        worker
            .on_tenant(Tenant::new(7, "Acme"))
            .as_user(User::new(3, "Jon"));

        let err = worker.execute(describe()).await.unwrap_err();
        assert_eq!(err.to_string(), "0|Describe|Acme (7)|Jon (3)|true");
    }

    #[tokio::test]
    async fn tenant_and_user_are_optional() {
        let worker = SyncWorker::new(Arc::new(Services::new()));

        let err = worker.execute(describe()).await.unwrap_err();
        assert_eq!(err.to_string(), "0|Describe|||false");
    }

    #[tokio::test]
    async fn success_is_returned_directly() {
        let worker = SyncWorker::new(Arc::new(Services::new()));
        let task = Task::new("Ok", |_ctx: Context| async { Ok(()) });

        assert!(worker.execute(task).await.is_ok());
    }
}
