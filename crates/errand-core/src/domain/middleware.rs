//! Middleware - `Job -> Job` wrappers.
//!
//! A worker holds exactly one middleware. Several cross-cutting concerns are
//! combined up front with [`chain`] and installed as a single function.

use std::sync::Arc;

use super::task::Job;

/// Middleware turns one job into another, typically by wrapping it.
pub type Middleware = Arc<dyn Fn(Job) -> Job + Send + Sync + 'static>;

pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(Job) -> Job + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Passes the job through unchanged.
pub fn identity() -> Middleware {
    Arc::new(|job: Job| job)
}

/// Fold `layers` into one middleware. The first layer is the outermost, so it
/// sees the context first and the result last.
pub fn chain<I>(layers: I) -> Middleware
where
    I: IntoIterator<Item = Middleware>,
{
    let layers: Vec<Middleware> = layers.into_iter().collect();
    Arc::new(move |job: Job| -> Job {
        layers
            .iter()
            .rev()
            .fold(job, |inner, layer| layer(inner))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::rstest;

    use super::*;
    use crate::domain::{Context, ContextBuilder, job};

    fn recording(label: &'static str, seen: Arc<Mutex<Vec<String>>>) -> Middleware {
        middleware(move |next: Job| {
            let seen = Arc::clone(&seen);
            crate::domain::job(move |ctx: Context| {
                let seen = Arc::clone(&seen);
                let next = Arc::clone(&next);
                async move {
                    seen.lock().unwrap().push(format!("{label}:before"));
                    let result = next(ctx).await;
                    seen.lock().unwrap().push(format!("{label}:after"));
                    result
                }
            })
        })
    }

    fn marker_job(seen: Arc<Mutex<Vec<String>>>) -> Job {
        job(move |_ctx: Context| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push("job".to_string());
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn identity_runs_the_job_untouched() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let wrapped = identity()(marker_job(Arc::clone(&seen)));

        wrapped(ContextBuilder::new("1", "t").build()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["job"]);
    }

    #[rstest]
    #[case::empty(vec![], vec!["job"])]
    #[case::single(vec!["a"], vec!["a:before", "job", "a:after"])]
    #[case::outermost_first(
        vec!["a", "b"],
        vec!["a:before", "b:before", "job", "b:after", "a:after"]
    )]
    #[tokio::test]
    async fn chain_wraps_in_declaration_order(
        #[case] labels: Vec<&'static str>,
        #[case] expected: Vec<&'static str>,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let layers = labels
            .into_iter()
            .map(|label| recording(label, Arc::clone(&seen)));

        let wrapped = chain(layers)(marker_job(Arc::clone(&seen)));
        wrapped(ContextBuilder::new("1", "t").build()).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), expected);
    }
}
