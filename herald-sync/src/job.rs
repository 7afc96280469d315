//! Job descriptors.
//!
//! A [`SyncJob`] names *what* to synchronise, never *with what content*: the
//! executor re-reads the entity when the job runs, so a job delivered twice,
//! late, or out of order still pushes the latest state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use herald_core::{EditionId, EntityRef, Locale, QueueName, UpdateType};

/// Which content endpoint a publish job writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentTarget {
    #[default]
    Live,
    Draft,
}

impl fmt::Display for ContentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTarget::Live => write!(f, "live"),
            ContentTarget::Draft => write!(f, "draft"),
        }
    }
}

/// The work a job performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobTask {
    /// Present `entity` in `locale` and PUT it to the live or draft store.
    Publish {
        entity: EntityRef,
        update_type: UpdateType,
        locale: Locale,
        target: ContentTarget,
    },
    /// Register a publish intent for a scheduled path.
    Schedule {
        base_path: String,
        publish_time: DateTime<Utc>,
    },
    /// Serve a coming-soon placeholder at the edition's path.
    ComingSoon { edition_id: EditionId, locale: Locale },
    /// Withdraw the publish intent for a path.
    Unschedule { base_path: String },
    /// Mark a path as gone.
    Gone { base_path: String },
}

/// One unit of deferred work, addressed to a named queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub queue: QueueName,
    #[serde(flatten)]
    pub task: JobTask,
}

impl SyncJob {
    pub fn new(queue: QueueName, task: JobTask) -> Self {
        Self { queue, task }
    }

    pub fn publish(
        queue: QueueName,
        entity: EntityRef,
        update_type: UpdateType,
        locale: Locale,
        target: ContentTarget,
    ) -> Self {
        Self::new(
            queue,
            JobTask::Publish {
                entity,
                update_type,
                locale,
                target,
            },
        )
    }

    /// Short job kind used in logs.
    pub fn kind(&self) -> &'static str {
        match &self.task {
            JobTask::Publish {
                target: ContentTarget::Live,
                ..
            } => "publish",
            JobTask::Publish {
                target: ContentTarget::Draft,
                ..
            } => "publish_draft",
            JobTask::Schedule { .. } => "schedule",
            JobTask::ComingSoon { .. } => "coming_soon",
            JobTask::Unschedule { .. } => "unschedule",
            JobTask::Gone { .. } => "gone",
        }
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.queue)?;
        match &self.task {
            JobTask::Publish {
                entity,
                update_type,
                locale,
                target,
            } => write!(f, "publish {entity} ({update_type}, {locale}, {target})"),
            JobTask::Schedule {
                base_path,
                publish_time,
            } => write!(f, "schedule {base_path} at {}", publish_time.to_rfc3339()),
            JobTask::ComingSoon { edition_id, locale } => {
                write!(f, "coming_soon content_item:{edition_id} ({locale})")
            }
            JobTask::Unschedule { base_path } => write!(f, "unschedule {base_path}"),
            JobTask::Gone { base_path } => write!(f, "gone {base_path}"),
        }
    }
}
