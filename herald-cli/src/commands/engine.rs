//! Wiring shared by the commands: config, content store, publishing client,
//! and either an in-memory queue (`--dry-run`) or a live worker pool.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use herald_core::{
    paths, Config, ContentItem, ContentSource, ContentStore, EditionId, EntityRef, Publishable,
    VisibilityPolicy,
};
use herald_sync::{
    DispatchOutcome, HttpPublishingClient, InMemoryQueue, JobExecutor, Publisher,
    PublishingClient, SyncError,
};
use herald_worker::{WorkerOptions, WorkerPool};

use super::report;
use super::DispatchFlags;

pub struct Engine {
    config: Config,
    store: Arc<ContentStore>,
    client: Arc<dyn PublishingClient>,
}

impl Engine {
    pub fn load() -> Result<Self> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
        let config = Config::load_at(&home)
            .with_context(|| format!("failed to load {}", paths::config_path(&home).display()))?;
        let client = Arc::new(HttpPublishingClient::from_config(&config.publishing_api));
        Ok(Self {
            store: Arc::new(ContentStore::at(&home)),
            config,
            client,
        })
    }

    pub fn publishable(&self, entity: EntityRef) -> Result<Publishable> {
        let found = match entity {
            EntityRef::ContentItem(id) => self
                .store
                .content_item(id)
                .with_context(|| format!("failed to read {entity}"))?
                .map(Publishable::from),
            EntityRef::Unpublishing(id) => self
                .store
                .unpublishing(id)
                .with_context(|| format!("failed to read {entity}"))?
                .map(Publishable::from),
        };
        found.with_context(|| format!("{entity} not found"))
    }

    pub fn content_item(&self, id: EditionId) -> Result<ContentItem> {
        self.store
            .content_item(id)
            .with_context(|| format!("failed to read content_item:{id}"))?
            .with_context(|| format!("content_item:{id} not found"))
    }

    /// A publisher whose queue only collects jobs. Used for synchronous
    /// operations that never enqueue.
    pub fn publisher(&self) -> Publisher {
        self.publisher_with(Arc::new(InMemoryQueue::new()))
    }

    fn publisher_with(&self, queue: Arc<dyn herald_sync::JobQueue>) -> Publisher {
        Publisher::new(
            queue,
            self.client.clone(),
            VisibilityPolicy::from_config(&self.config),
            self.config.default_queue.clone(),
        )
    }

    /// Run `dispatch` against a dry-run queue or a worker pool, then report.
    pub fn dispatch<F>(&self, label: &str, flags: DispatchFlags, dispatch: F) -> Result<()>
    where
        F: FnOnce(&Publisher) -> Result<DispatchOutcome, SyncError>,
    {
        if flags.dry_run {
            let queue = Arc::new(InMemoryQueue::new());
            let publisher = self.publisher_with(queue.clone());
            let outcome = dispatch(&publisher).with_context(|| format!("{label} failed"))?;
            return report::print_outcome(label, &outcome, None, flags);
        }

        let executor = Arc::new(JobExecutor::new(self.store.clone(), self.client.clone()));
        let options = WorkerOptions::from(&self.config.worker);
        let runtime = herald_worker::build_runtime()?;

        let (outcome, stats) = runtime.block_on(async {
            let pool = WorkerPool::start(executor, options);
            let publisher = self.publisher_with(Arc::new(pool.queue()));
            let outcome = match dispatch(&publisher) {
                Ok(outcome) => outcome,
                Err(err) => {
                    // Jobs enqueued before the failure still run out their grace period.
                    let _ = pool.shutdown().await;
                    return Err(anyhow::Error::new(err).context(format!("{label} failed")));
                }
            };
            pool.wait_idle().await;
            let stats = pool.shutdown().await?;
            Ok::<_, anyhow::Error>((outcome, stats))
        })?;

        report::print_outcome(label, &outcome, Some(stats), flags)?;
        if stats.failed > 0 || stats.dropped > 0 {
            bail!(
                "{} job(s) failed, {} dropped; see log output for details",
                stats.failed,
                stats.dropped
            );
        }
        Ok(())
    }
}
