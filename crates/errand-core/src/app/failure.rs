//! Failure reporting for the dispatch loop.

use std::any::Any;

use tokio::task::JoinError;

use crate::domain::FailureScope;

/// The multi-line block logged when a task fails:
///
/// ```text
/// Task: SendEmail
/// Tenant: Acme (7)
/// User: not signed in
/// smtp timeout
/// ```
pub fn failure_message(task_name: &str, scope: &FailureScope, error: &str) -> String {
    format!(
        "Task: {}\nTenant: {}\nUser: {}\n{}",
        task_name,
        scope.tenant(),
        scope.user(),
        error
    )
}

/// Describe why a spawned job did not return.
pub(crate) fn join_failure(err: JoinError) -> String {
    if err.is_cancelled() {
        return "cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        Err(err) => err.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{ContextBuilder, Tenant};

    #[test]
    fn message_lists_task_tenant_user_and_error() {
        let ctx = ContextBuilder::new("1", "SendEmail")
            .tenant(Arc::new(Tenant::new(7, "Acme")))
            .build();

        let message = failure_message("SendEmail", &FailureScope::of(&ctx), "smtp timeout");

        assert_eq!(
            message,
            "Task: SendEmail\nTenant: Acme (7)\nUser: not signed in\nsmtp timeout"
        );
    }

    #[tokio::test]
    async fn join_failure_reports_panic_payload() {
        let handle = tokio::spawn(async {
            panic!("boom");
        });
        let err = handle.await.unwrap_err();

        assert_eq!(join_failure(err), "panicked: boom");
    }

    #[tokio::test]
    async fn join_failure_reports_formatted_panic_payload() {
        let code = 42;
        let handle = tokio::spawn(async move {
            panic!("exit {code}");
        });
        let err = handle.await.unwrap_err();

        assert_eq!(join_failure(err), "panicked: exit 42");
    }
}
