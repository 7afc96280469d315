//! Channel-backed job queue.
//!
//! Every enqueued job counts as pending until the pool reports it finished
//! (delivered, dropped, or dead). Retries stay pending while they wait.
//! Once closed, the queue refuses new jobs but still carries retries.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Notify};

use herald_sync::{EnqueueError, JobQueue, SyncJob};

/// A job plus the attempt number it is about to make (from 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub job: SyncJob,
    pub attempt: u32,
}

#[derive(Debug, Default)]
struct Pending {
    count: AtomicUsize,
    idle: Notify,
    closed: AtomicBool,
}

/// Sending half of the worker pool's delivery channel.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    tx: mpsc::UnboundedSender<Delivery>,
    pending: Arc<Pending>,
}

impl ChannelQueue {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let queue = Self {
            tx,
            pending: Arc::new(Pending::default()),
        };
        (queue, rx)
    }

    /// Jobs enqueued and not yet finished.
    pub fn pending(&self) -> usize {
        self.pending.count.load(Ordering::SeqCst)
    }

    /// Resolve once no jobs are pending.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.pending.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Refuse further enqueues.
    pub(crate) fn close(&self) {
        self.pending.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.pending.closed.load(Ordering::SeqCst)
    }

    /// Put a retry at the back of the channel. The job stays pending.
    pub(crate) fn redeliver(&self, delivery: Delivery) -> Result<(), EnqueueError> {
        self.tx.send(delivery).map_err(|_| {
            self.complete();
            EnqueueError::QueueClosed
        })
    }

    /// Mark one pending job finished.
    pub(crate) fn complete(&self) {
        if self.pending.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.pending.idle.notify_waiters();
        }
    }
}

impl JobQueue for ChannelQueue {
    fn enqueue(&self, job: SyncJob) -> Result<(), EnqueueError> {
        if self.is_closed() {
            return Err(EnqueueError::QueueClosed);
        }
        self.pending.count.fetch_add(1, Ordering::SeqCst);
        self.tx
            .send(Delivery { job, attempt: 1 })
            .map_err(|_| {
                self.complete();
                EnqueueError::QueueClosed
            })
    }
}
