//! Herald core library: domain types, content records, policy, config.
//!
//! - [`types`]: identifiers, locales, lifecycle state, formats
//! - [`content`]: stored records and the views assembled from them
//! - [`source`]: the [`ContentSource`] boundary and an in-memory source
//! - [`store`]: YAML-on-disk content store
//! - [`policy`]: [`VisibilityPolicy`]
//! - [`config`]: `~/.herald/config.yaml`

pub mod config;
pub mod content;
pub mod error;
pub mod paths;
pub mod policy;
pub mod source;
pub mod store;
pub mod types;

pub use config::{Config, PublishingApiConfig, WorkerConfig};
pub use content::{
    ContentItem, Document, DocumentRecord, EditionRecord, Publishable, Redirect, RedirectRoute,
    RouteType, Translation, Unpublishing, UnpublishingRecord, VersionRecord,
};
pub use error::{ConfigError, ContentError};
pub use policy::VisibilityPolicy;
pub use source::{ContentSource, MemorySource};
pub use store::ContentStore;
pub use types::{
    ContentFormat, ContentState, DocumentId, EditionId, EntityClass, EntityRef, Locale,
    QueueName, UnpublishingId, UpdateType,
};
