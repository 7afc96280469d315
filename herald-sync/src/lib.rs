//! # herald-sync
//!
//! The publishing synchronization engine.
//!
//! [`Publisher`] turns content changes into [`SyncJob`]s on a [`JobQueue`];
//! [`JobExecutor`] runs those jobs against a [`PublishingClient`], always
//! re-reading the entity first.

pub mod client;
pub mod error;
pub mod executor;
pub mod job;
pub mod orchestrator;
pub mod queue;

pub use client::{ClientCall, HttpPublishingClient, PublishingClient, RecordingClient, RemoteState};
pub use error::{ClientError, EnqueueError, ExecuteError, SyncError};
pub use executor::{ExecutionOutcome, JobExecutor};
pub use job::{ContentTarget, JobTask, SyncJob};
pub use orchestrator::{DispatchOptions, DispatchOutcome, Publisher, SkipReason};
pub use queue::{InMemoryQueue, JobQueue};
