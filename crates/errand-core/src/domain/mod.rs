//! Domain model (tasks, jobs, contexts, middleware, errors).

pub mod context;
pub mod errors;
pub mod middleware;
pub mod principal;
pub mod services;
pub mod task;

pub use self::context::{Context, ContextBuilder};
pub use self::errors::{FailureScope, JobError, WorkerError};
pub use self::middleware::{Middleware, chain, identity, middleware};
pub use self::principal::{Tenant, User};
pub use self::services::Services;
pub use self::task::{Job, JobFuture, Task, job};
