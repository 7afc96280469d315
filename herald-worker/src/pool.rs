//! Worker pool: pulls deliveries off the channel, runs them on the blocking
//! pool under a concurrency limit, and re-delivers retryable failures after
//! a backoff.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use herald_core::WorkerConfig;
use herald_sync::{ExecutionOutcome, JobExecutor, SyncJob};

use crate::error::WorkerError;
use crate::queue::{ChannelQueue, Delivery};
use crate::retry::RetryPolicy;

/// Pool sizing, retry budget and shutdown grace period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOptions {
    pub concurrency: usize,
    pub retry: RetryPolicy,
    pub shutdown_grace: Duration,
}

impl From<&WorkerConfig> for WorkerOptions {
    fn from(config: &WorkerConfig) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            retry: RetryPolicy::from(config),
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
        }
    }
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self::from(&WorkerConfig::default())
    }
}

/// Counters reported by [`WorkerPool::shutdown`]. Every enqueued job ends up
/// in exactly one of `delivered`, `missing`, `failed` or `dropped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub delivered: usize,
    pub missing: usize,
    pub retried: usize,
    pub failed: usize,
    pub dropped: usize,
}

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicUsize,
    missing: AtomicUsize,
    retried: AtomicUsize,
    failed: AtomicUsize,
    dropped: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> WorkerStats {
        WorkerStats {
            delivered: self.delivered.load(Ordering::SeqCst),
            missing: self.missing.load(Ordering::SeqCst),
            retried: self.retried.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            dropped: self.dropped.load(Ordering::SeqCst),
        }
    }
}

/// Shared state handed to each delivery task.
#[derive(Clone)]
struct Worker {
    executor: Arc<JobExecutor>,
    queue: ChannelQueue,
    retry: RetryPolicy,
    counters: Arc<Counters>,
    stop: watch::Receiver<bool>,
}

pub struct WorkerPool {
    queue: ChannelQueue,
    stop_tx: watch::Sender<bool>,
    dispatcher: JoinHandle<Result<(), WorkerError>>,
    shutdown_grace: Duration,
    counters: Arc<Counters>,
}

impl WorkerPool {
    /// Start the pool on the current tokio runtime.
    pub fn start(executor: Arc<JobExecutor>, options: WorkerOptions) -> Self {
        let (queue, rx) = ChannelQueue::channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        let concurrency = options.concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let counters = Arc::new(Counters::default());

        let worker = Worker {
            executor,
            queue: queue.clone(),
            retry: options.retry,
            counters: counters.clone(),
            stop: stop_rx,
        };
        let dispatcher = tokio::spawn(dispatch_task(worker, rx, semaphore));
        tracing::info!(concurrency, max_attempts = options.retry.max_attempts, "worker pool started");

        Self {
            queue,
            stop_tx,
            dispatcher,
            shutdown_grace: options.shutdown_grace,
            counters,
        }
    }

    /// The queue to hand to a `Publisher`.
    pub fn queue(&self) -> ChannelQueue {
        self.queue.clone()
    }

    /// Counters so far. Jobs still pending appear in none of the final buckets.
    pub fn stats(&self) -> WorkerStats {
        self.counters.snapshot()
    }

    /// Resolve once every enqueued job has finished, retries included.
    pub async fn wait_idle(&self) {
        self.queue.wait_idle().await;
    }

    /// Refuse new jobs, give pending ones (retries included) up to the grace
    /// period to finish, then stop and count whatever is left as dropped.
    pub async fn shutdown(self) -> Result<WorkerStats, WorkerError> {
        self.queue.close();
        if tokio::time::timeout(self.shutdown_grace, self.queue.wait_idle())
            .await
            .is_err()
        {
            tracing::warn!(
                pending = self.queue.pending(),
                grace_ms = self.shutdown_grace.as_millis() as u64,
                "shutdown grace period elapsed, dropping pending jobs"
            );
        }

        self.stop_tx.send_replace(true);
        handle_join("dispatcher", self.dispatcher.await)?;
        // In-flight executions and cancelled retries still report in.
        self.queue.wait_idle().await;

        let stats = self.counters.snapshot();
        tracing::info!(
            delivered = stats.delivered,
            missing = stats.missing,
            retried = stats.retried,
            failed = stats.failed,
            dropped = stats.dropped,
            "worker pool stopped"
        );
        Ok(stats)
    }
}

/// Resolve once the stop flag is raised, or its sender is gone.
async fn stopped(stop: &mut watch::Receiver<bool>) {
    loop {
        if *stop.borrow_and_update() {
            return;
        }
        if stop.changed().await.is_err() {
            return;
        }
    }
}

async fn dispatch_task(
    worker: Worker,
    mut rx: mpsc::UnboundedReceiver<Delivery>,
    semaphore: Arc<Semaphore>,
) -> Result<(), WorkerError> {
    let mut stop = worker.stop.clone();
    loop {
        tokio::select! {
            _ = stopped(&mut stop) => break,
            delivery = rx.recv() => {
                let Some(delivery) = delivery else { break };
                let permit = semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| WorkerError::ChannelClosed("worker semaphore"))?;
                tokio::spawn(worker.clone().run(delivery, permit));
            }
        }
    }

    rx.close();
    while let Ok(delivery) = rx.try_recv() {
        worker.drop_job(&delivery.job, "buffered at shutdown");
        worker.queue.complete();
    }
    Ok(())
}

impl Worker {
    async fn run(self, delivery: Delivery, permit: OwnedSemaphorePermit) {
        let Delivery { job, attempt } = delivery;
        let executor = self.executor.clone();
        let result = {
            let job = job.clone();
            tokio::task::spawn_blocking(move || executor.execute(&job)).await
        };
        drop(permit);

        match result {
            Ok(Ok(ExecutionOutcome::Delivered)) => {
                self.counters.delivered.fetch_add(1, Ordering::SeqCst);
                self.queue.complete();
            }
            Ok(Ok(ExecutionOutcome::EntityMissing)) => {
                self.counters.missing.fetch_add(1, Ordering::SeqCst);
                self.queue.complete();
            }
            Ok(Err(err)) if err.is_retryable() && self.retry.should_retry(attempt) => {
                self.counters.retried.fetch_add(1, Ordering::SeqCst);
                let delay = self.retry.delay_for(attempt);
                tracing::warn!(
                    job = %job,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "delivery failed, retrying"
                );
                self.retry_after(job, attempt + 1, delay).await;
            }
            Ok(Err(err)) => {
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!(job = %job, attempt, error = %err, "job failed permanently");
                self.queue.complete();
            }
            Err(err) => {
                self.counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::error!(job = %job, error = %err, "executor panicked");
                self.queue.complete();
            }
        }
    }

    /// Sleep out the backoff, then re-deliver. A stop signal cuts the wait
    /// short and the job is dropped.
    async fn retry_after(&self, job: SyncJob, attempt: u32, delay: Duration) {
        let mut stop = self.stop.clone();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                let next = Delivery { job: job.clone(), attempt };
                // redeliver marks the job finished when the channel is gone.
                if self.queue.redeliver(next).is_err() {
                    self.drop_job(&job, "retry after shutdown");
                }
            }
            _ = stopped(&mut stop) => {
                self.drop_job(&job, "retry pending at shutdown");
                self.queue.complete();
            }
        }
    }

    fn drop_job(&self, job: &SyncJob, reason: &'static str) {
        self.counters.dropped.fetch_add(1, Ordering::SeqCst);
        tracing::warn!(job = %job, reason, "job dropped");
    }
}
fn handle_join(
    task: &'static str,
    result: Result<Result<(), WorkerError>, tokio::task::JoinError>,
) -> Result<(), WorkerError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(WorkerError::Join {
            task,
            message: err.to_string(),
        }),
    }
}

/// Multi-threaded runtime for callers outside async code.
pub fn build_runtime() -> Result<tokio::runtime::Runtime, WorkerError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)
}
