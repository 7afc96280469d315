//! The job substrate boundary.

use std::sync::Mutex;

use crate::error::EnqueueError;
use crate::job::SyncJob;

/// Accepts jobs for at-least-once, possibly reordered, execution.
pub trait JobQueue: Send + Sync {
    fn enqueue(&self, job: SyncJob) -> Result<(), EnqueueError>;
}

/// Collects jobs in memory without running them. Used by `--dry-run` and
/// by tests that assert on what was enqueued.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    jobs: Mutex<Vec<SyncJob>>,
    closed: Mutex<bool>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of enqueued jobs in enqueue order.
    pub fn jobs(&self) -> Vec<SyncJob> {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Remove and return every enqueued job.
    pub fn drain(&self) -> Vec<SyncJob> {
        std::mem::take(&mut *self.jobs.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject every later enqueue with [`EnqueueError::QueueClosed`].
    pub fn close(&self) {
        *self.closed.lock().unwrap_or_else(|e| e.into_inner()) = true;
    }
}

impl JobQueue for InMemoryQueue {
    fn enqueue(&self, job: SyncJob) -> Result<(), EnqueueError> {
        if *self.closed.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(EnqueueError::QueueClosed);
        }
        self.jobs.lock().unwrap_or_else(|e| e.into_inner()).push(job);
        Ok(())
    }
}
