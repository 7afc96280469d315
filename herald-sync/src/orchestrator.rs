//! Dispatch orchestrator.
//!
//! Decides which jobs a content change needs and enqueues them, one per
//! locale in ascending locale order. Only [`Publisher::publish_redirect`]
//! touches the network; everything else just enqueues.
//!
//! | Operation              | Gate                                   | Jobs per locale              |
//! |------------------------|----------------------------------------|------------------------------|
//! | `publish_async`        | untracked unpublishing → skip          | `Publish` (live)             |
//! | `publish_draft_async`  | untracked unpublishing → skip          | `Publish` (draft)            |
//! | `republish_async`      | not publicly visible → error           | `Publish` (live, republish)  |
//! | `schedule_async`       | first external version → skip          | `Schedule`, `ComingSoon`     |
//! | `unschedule_async`     | first external version → skip          | `Unschedule`, `Gone`         |

use std::fmt;
use std::sync::Arc;

use herald_core::{ContentItem, Publishable, QueueName, Redirect, UpdateType, VisibilityPolicy};
use herald_presenter::{present_redirect, public_document_path};

use crate::client::PublishingClient;
use crate::error::SyncError;
use crate::job::{ContentTarget, JobTask, SyncJob};
use crate::queue::JobQueue;

/// Caller overrides for a dispatch. Unset fields take the operation's default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    pub update_type: Option<UpdateType>,
    pub queue: Option<QueueName>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_type(mut self, update_type: impl Into<UpdateType>) -> Self {
        self.update_type = Some(update_type.into());
        self
    }

    pub fn queue(mut self, queue: impl Into<QueueName>) -> Self {
        self.queue = Some(queue.into());
        self
    }
}

/// Why a dispatch enqueued nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The content's format is still served by this platform.
    UntrackedType,
    /// No earlier version of the document reached the external store.
    FirstExternalVersion,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UntrackedType => write!(f, "format is not tracked by the content store"),
            SkipReason::FirstExternalVersion => write!(f, "first externally tracked version"),
        }
    }
}

/// Result of an async dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Enqueued { jobs: Vec<SyncJob> },
    Skipped(SkipReason),
}

impl DispatchOutcome {
    /// Jobs enqueued; empty when skipped.
    pub fn jobs(&self) -> &[SyncJob] {
        match self {
            DispatchOutcome::Enqueued { jobs } => jobs,
            DispatchOutcome::Skipped(_) => &[],
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DispatchOutcome::Skipped(_))
    }
}

/// The orchestrator. Cheap to clone; holds shared handles only.
#[derive(Clone)]
pub struct Publisher {
    queue: Arc<dyn JobQueue>,
    client: Arc<dyn PublishingClient>,
    policy: VisibilityPolicy,
    default_queue: QueueName,
}

impl Publisher {
    pub fn new(
        queue: Arc<dyn JobQueue>,
        client: Arc<dyn PublishingClient>,
        policy: VisibilityPolicy,
        default_queue: QueueName,
    ) -> Self {
        Self {
            queue,
            client,
            policy,
            default_queue,
        }
    }

    /// Enqueue one live publish job per translated locale.
    pub fn publish_async(
        &self,
        entity: &Publishable,
        options: DispatchOptions,
    ) -> Result<DispatchOutcome, SyncError> {
        self.fan_out(entity, options, UpdateType::major(), ContentTarget::Live)
    }

    /// As [`publish_async`](Self::publish_async), against the draft store.
    pub fn publish_draft_async(
        &self,
        entity: &Publishable,
        options: DispatchOptions,
    ) -> Result<DispatchOutcome, SyncError> {
        self.fan_out(entity, options, UpdateType::major(), ContentTarget::Draft)
    }

    /// Re-send publicly visible content with `update_type = "republish"`.
    pub fn republish_async(
        &self,
        entity: &Publishable,
        options: DispatchOptions,
    ) -> Result<DispatchOutcome, SyncError> {
        if !self.policy.is_publicly_visible(entity) {
            let err = SyncError::UnpublishableState {
                entity: entity.entity_ref(),
                state: entity.content_item().state,
            };
            tracing::warn!(entity = %entity.entity_ref(), "{err}");
            return Err(err);
        }
        self.fan_out(entity, options, UpdateType::republish(), ContentTarget::Live)
    }

    /// Announce a scheduled edition: a publish intent and a coming-soon
    /// placeholder per locale.
    pub fn schedule_async(&self, item: &ContentItem) -> Result<DispatchOutcome, SyncError> {
        if self.policy.is_first_external_version(item) {
            return Ok(self.skip(item, "schedule", SkipReason::FirstExternalVersion));
        }
        let publish_time = item
            .scheduled_publication
            .ok_or(SyncError::MissingPublishTime { edition: item.id })?;

        let jobs = item
            .locales()
            .into_iter()
            .flat_map(|locale| {
                let base_path = public_document_path(item, &locale);
                [
                    JobTask::Schedule {
                        base_path,
                        publish_time,
                    },
                    JobTask::ComingSoon {
                        edition_id: item.id,
                        locale,
                    },
                ]
            })
            .map(|task| SyncJob::new(self.default_queue.clone(), task))
            .collect();
        self.enqueue_all(jobs)
    }

    /// Undo [`schedule_async`](Self::schedule_async): drop the intent and
    /// mark each locale's path gone.
    pub fn unschedule_async(&self, item: &ContentItem) -> Result<DispatchOutcome, SyncError> {
        if self.policy.is_first_external_version(item) {
            return Ok(self.skip(item, "unschedule", SkipReason::FirstExternalVersion));
        }

        let jobs = item
            .locales()
            .into_iter()
            .flat_map(|locale| {
                let base_path = public_document_path(item, &locale);
                [
                    JobTask::Unschedule {
                        base_path: base_path.clone(),
                    },
                    JobTask::Gone { base_path },
                ]
            })
            .map(|task| SyncJob::new(self.default_queue.clone(), task))
            .collect();
        self.enqueue_all(jobs)
    }

    /// Present and send a redirect now, on the caller's thread.
    pub fn publish_redirect(&self, redirect: &Redirect) -> Result<(), SyncError> {
        let payload = present_redirect(redirect, &UpdateType::major());
        self.client.put_redirect(&redirect.base_path, &payload)?;
        tracing::info!(
            base_path = %redirect.base_path,
            routes = redirect.redirects.len(),
            "published redirect"
        );
        Ok(())
    }

    fn fan_out(
        &self,
        entity: &Publishable,
        options: DispatchOptions,
        default_update_type: UpdateType,
        target: ContentTarget,
    ) -> Result<DispatchOutcome, SyncError> {
        if let Publishable::Unpublishing(unpublishing) = entity {
            if !self.policy.is_externally_tracked(unpublishing.edition.format) {
                return Ok(self.skip(entity.content_item(), "publish", SkipReason::UntrackedType));
            }
        }

        let update_type = options.update_type.unwrap_or(default_update_type);
        let queue = options.queue.unwrap_or_else(|| self.default_queue.clone());
        let entity_ref = entity.entity_ref();

        let jobs = entity
            .locales()
            .into_iter()
            .map(|locale| SyncJob::publish(queue.clone(), entity_ref, update_type.clone(), locale, target))
            .collect();
        self.enqueue_all(jobs)
    }

    fn enqueue_all(&self, jobs: Vec<SyncJob>) -> Result<DispatchOutcome, SyncError> {
        for job in &jobs {
            if let Err(e) = self.queue.enqueue(job.clone()) {
                tracing::error!(job = %job, error = %e, "enqueue failed");
                return Err(e.into());
            }
            tracing::info!(job = %job, "enqueued");
        }
        Ok(DispatchOutcome::Enqueued { jobs })
    }

    fn skip(&self, item: &ContentItem, operation: &str, reason: SkipReason) -> DispatchOutcome {
        tracing::info!(edition = %item.id, operation, %reason, "skipped");
        DispatchOutcome::Skipped(reason)
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("policy", &self.policy)
            .field("default_queue", &self.default_queue)
            .finish_non_exhaustive()
    }
}
