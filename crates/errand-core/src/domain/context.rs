//! Context - per-execution state handed to a job.
//!
//! A `Context` is produced in one step by [`ContextBuilder::build`] and has no
//! setters, so a job never observes a half-filled value. Middleware that wants
//! to attach a tenant or user derives a new context with
//! [`Context::to_builder`].

use std::fmt;
use std::sync::Arc;

use super::principal::{Tenant, User};
use super::services::Services;
use crate::impls::NoopLogger;
use crate::ports::Logger;

/// Context is what a job sees while it runs: who runs it, for which tenant
/// and user, and the services and logger it may use.
pub struct Context {
    worker_id: String,
    task_name: String,
    tenant: Option<Arc<Tenant>>,
    user: Option<Arc<User>>,
    services: Arc<Services>,
    logger: Arc<dyn Logger>,
}

impl Context {
    /// Identity of the dispatch loop running this job.
    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    /// `None` when no tenant is in scope.
    pub fn tenant(&self) -> Option<&Tenant> {
        self.tenant.as_deref()
    }

    /// `None` when nobody is signed in.
    pub fn user(&self) -> Option<&User> {
        self.user.as_deref()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Start a builder pre-filled with every field of this context.
    pub fn to_builder(&self) -> ContextBuilder {
        ContextBuilder {
            worker_id: self.worker_id.clone(),
            task_name: self.task_name.clone(),
            tenant: self.tenant.clone(),
            user: self.user.clone(),
            services: Arc::clone(&self.services),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("worker_id", &self.worker_id)
            .field("task_name", &self.task_name)
            .field("tenant", &self.tenant)
            .field("user", &self.user)
            .field("services", &self.services)
            .finish_non_exhaustive()
    }
}

/// ContextBuilder collects the fields of a [`Context`].
///
/// Unset fields default to: no tenant, no user, an empty service registry and
/// a [`NoopLogger`].
pub struct ContextBuilder {
    worker_id: String,
    task_name: String,
    tenant: Option<Arc<Tenant>>,
    user: Option<Arc<User>>,
    services: Arc<Services>,
    logger: Arc<dyn Logger>,
}

impl ContextBuilder {
    pub fn new(worker_id: impl Into<String>, task_name: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            task_name: task_name.into(),
            tenant: None,
            user: None,
            services: Arc::new(Services::new()),
            logger: Arc::new(NoopLogger),
        }
    }

    pub fn tenant(mut self, tenant: impl Into<Option<Arc<Tenant>>>) -> Self {
        self.tenant = tenant.into();
        self
    }

    pub fn user(mut self, user: impl Into<Option<Arc<User>>>) -> Self {
        self.user = user.into();
        self
    }

    pub fn services(mut self, services: Arc<Services>) -> Self {
        self.services = services;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> Context {
        Context {
            worker_id: self.worker_id,
            task_name: self.task_name,
            tenant: self.tenant,
            user: self.user,
            services: self.services,
            logger: self.logger,
        }
    }
}
