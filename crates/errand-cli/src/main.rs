use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use errand_core::domain::{
    Context, Job, JobError, Middleware, Services, Task, Tenant, chain, job, middleware,
};
use errand_core::{BackgroundWorker, Logger, Worker, WorkerConfig};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;
use ulid::Ulid;

#[derive(Debug, Serialize, Deserialize)]
struct WelcomePayload {
    email: String,
    name: String,
}

/// Stand-in for a mail service registered in `Services`.
#[derive(Default)]
struct Outbox {
    sent: AtomicU32,
}

fn deliver(ctx: &Context, raw: &[u8]) -> Result<(), JobError> {
    let payload: WelcomePayload = serde_json::from_slice(raw).map_err(JobError::from_source)?;
    if !payload.email.contains('@') {
        return Err(JobError::new(format!("invalid address {:?}", payload.email)));
    }

    let outbox = ctx.services().get::<Outbox>().ok_or("outbox service missing")?;
    outbox.sent.fetch_add(1, Ordering::Relaxed);

    let tenant = ctx.tenant().map(ToString::to_string).unwrap_or_default();
    ctx.logger().info(&format!(
        "Welcome email for {} sent to {} (tenant {tenant}).",
        payload.name, payload.email
    ));
    Ok(())
}

/// The JSON payload travels with the task and is decoded inside the job.
fn send_welcome(raw: Vec<u8>, done: mpsc::UnboundedSender<()>) -> Task {
    Task::new("SendWelcome", move |ctx: Context| {
        let raw = raw.clone();
        let done = done.clone();
        async move {
            let result = deliver(&ctx, &raw);
            let _ = done.send(());
            result
        }
    })
}

fn timing() -> Middleware {
    middleware(|next: Job| {
        job(move |ctx: Context| {
            let next = Arc::clone(&next);
            async move {
                let started = Instant::now();
                let task = ctx.task_name().to_string();
                let result = next(ctx).await;
                tracing::debug!(%task, elapsed = ?started.elapsed(), ok = result.is_ok(), "task finished");
                result
            }
        })
    })
}

fn on_tenant(tenant: Tenant) -> Middleware {
    let tenant = Arc::new(tenant);
    middleware(move |next: Job| {
        let tenant = Arc::clone(&tenant);
        job(move |ctx: Context| next(ctx.to_builder().tenant(Arc::clone(&tenant)).build()))
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // (A) build the worker; capacity and tag can be overridden from the environment
    let worker = Arc::new(
        BackgroundWorker::builder()
            .config(WorkerConfig::from_env()?)
            .services(Arc::new(Services::new().with(Outbox::default())))
            .middleware(chain([timing(), on_tenant(Tenant::new(1, "demo"))]))
            .build()?,
    );

    // (B) start a single dispatch loop
    let worker_id = Ulid::new().to_string();
    let handle = tokio::spawn({
        let worker = Arc::clone(&worker);
        async move { worker.run(&worker_id).await }
    });

    // (C) enqueue tasks; the second has a bad address and fails
    let recipients = [
        ("ada@example.com", "Ada"),
        ("not-an-address", "Bob"),
        ("grace@example.com", "Grace"),
    ];
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    for (email, name) in recipients {
        let raw = serde_json::to_vec(&WelcomePayload {
            email: email.to_string(),
            name: name.to_string(),
        })?;
        worker.enqueue(send_welcome(raw, done_tx.clone())).await;
    }
    worker
        .logger()
        .info(&format!("Enqueued {} tasks, queue depth {}.", recipients.len(), worker.len()));

    // (D) wait until every task has run
    for _ in 0..recipients.len() {
        done_rx.recv().await;
    }
    let sent = worker
        .services()
        .get::<Outbox>()
        .map_or(0, |outbox| outbox.sent.load(Ordering::Relaxed));
    worker
        .logger()
        .info(&format!("{sent} of {} welcome emails sent.", recipients.len()));

    // (E) stop the loop
    worker.shutdown();
    handle.await??;
    Ok(())
}
