//! Job executor.
//!
//! Runs one [`SyncJob`]: re-reads the entity from the content source,
//! presents it from its current state, and makes one idempotent call to the
//! publishing API. Running the same job twice leaves the API in the same
//! state as running it once.

use std::sync::Arc;

use herald_core::{ContentSource, EntityRef, Publishable};
use herald_presenter::{present, present_coming_soon, present_gone, present_publish_intent, Presentable};

use crate::client::PublishingClient;
use crate::error::ExecuteError;
use crate::job::{ContentTarget, JobTask, SyncJob};

/// What executing a job amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The publishing API accepted the call.
    Delivered,
    /// The entity was deleted after the job was enqueued; nothing was sent.
    EntityMissing,
}

pub struct JobExecutor {
    source: Arc<dyn ContentSource>,
    client: Arc<dyn PublishingClient>,
}

impl JobExecutor {
    pub fn new(source: Arc<dyn ContentSource>, client: Arc<dyn PublishingClient>) -> Self {
        Self { source, client }
    }

    /// Execute `job` once. Blocking; callers on an async runtime should run
    /// it on a blocking thread.
    pub fn execute(&self, job: &SyncJob) -> Result<ExecutionOutcome, ExecuteError> {
        let outcome = match &job.task {
            JobTask::Publish {
                entity,
                update_type,
                locale,
                target,
            } => {
                let Some(publishable) = self.fetch(*entity)? else {
                    return Ok(self.missing(job));
                };
                let payload = present(Presentable::from(&publishable), update_type, locale)?;
                match target {
                    ContentTarget::Live => self.client.put_live_content(&payload.base_path, &payload)?,
                    ContentTarget::Draft => self.client.put_draft_content(&payload.base_path, &payload)?,
                }
                ExecutionOutcome::Delivered
            }
            JobTask::Schedule {
                base_path,
                publish_time,
            } => {
                let intent = present_publish_intent(base_path, *publish_time);
                self.client.put_intent(base_path, &intent)?;
                ExecutionOutcome::Delivered
            }
            JobTask::ComingSoon { edition_id, locale } => {
                let Some(item) = self.source.content_item(*edition_id)? else {
                    return Ok(self.missing(job));
                };
                let payload = present_coming_soon(&item, locale)?;
                self.client.put_live_content(&payload.base_path, &payload)?;
                ExecutionOutcome::Delivered
            }
            JobTask::Unschedule { base_path } => {
                self.client.delete_intent(base_path)?;
                ExecutionOutcome::Delivered
            }
            JobTask::Gone { base_path } => {
                self.client.put_live_content(base_path, &present_gone(base_path))?;
                ExecutionOutcome::Delivered
            }
        };
        tracing::info!(job = %job, "delivered");
        Ok(outcome)
    }

    fn fetch(&self, entity: EntityRef) -> Result<Option<Publishable>, ExecuteError> {
        let found = match entity {
            EntityRef::ContentItem(id) => self.source.content_item(id)?.map(Publishable::from),
            EntityRef::Unpublishing(id) => self.source.unpublishing(id)?.map(Publishable::from),
        };
        Ok(found)
    }

    fn missing(&self, job: &SyncJob) -> ExecutionOutcome {
        tracing::warn!(job = %job, "entity no longer exists; dropping job");
        ExecutionOutcome::EntityMissing
    }
}
