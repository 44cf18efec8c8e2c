//! Errors - job failures and engine errors.

use thiserror::Error;

use super::context::Context;

/// Tenant and user descriptors captured from the context a job failed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureScope {
    tenant: String,
    user: String,
}

impl FailureScope {
    pub const NO_TENANT: &'static str = "undefined";
    pub const NO_USER: &'static str = "not signed in";

    pub fn of(ctx: &Context) -> Self {
        Self {
            tenant: ctx
                .tenant()
                .map_or_else(|| Self::NO_TENANT.to_string(), ToString::to_string),
            user: ctx
                .user()
                .map_or_else(|| Self::NO_USER.to_string(), ToString::to_string),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

/// JobError is what a job returns to report failure.
///
/// The dispatch loop records the [`FailureScope`] of the innermost context the
/// job ran under, so tenant/user attached by middleware show up in the log.
#[derive(Debug)]
pub struct JobError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    scope: Option<FailureScope>,
}

impl JobError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
            scope: None,
        }
    }

    /// Wrap another error; its `Display` becomes the message.
    pub fn from_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
            scope: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn scope(&self) -> Option<&FailureScope> {
        self.scope.as_ref()
    }

    /// Attach a scope unless one is already recorded (innermost wins).
    pub(crate) fn in_scope(mut self, scope: FailureScope) -> Self {
        if self.scope.is_none() {
            self.scope = Some(scope);
        }
        self
    }
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

impl From<String> for JobError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for JobError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors raised by the engine itself (never by jobs).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkerError {
    #[error("queue capacity must be greater than zero")]
    InvalidCapacity,

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },

    #[error("worker already has a running dispatch loop")]
    AlreadyRunning,
}
