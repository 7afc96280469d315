//! Visibility policy: pure predicates over lifecycle state and format.

use std::collections::BTreeSet;

use crate::config::Config;
use crate::content::{ContentItem, Publishable};
use crate::types::ContentFormat;

/// Decides what is publicly visible and what the external store tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    served_locally: BTreeSet<ContentFormat>,
}

impl VisibilityPolicy {
    pub fn new(served_locally: impl IntoIterator<Item = ContentFormat>) -> Self {
        Self {
            served_locally: served_locally.into_iter().collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.served_locally.iter().copied())
    }

    /// Content items are visible when published, archived or withdrawn.
    /// An unpublishing records the removal of visible content, so it is
    /// always eligible for republishing.
    pub fn is_publicly_visible(&self, entity: &Publishable) -> bool {
        match entity {
            Publishable::ContentItem(item) => item.state.is_publicly_visible(),
            Publishable::Unpublishing(_) => true,
        }
    }

    /// False for formats still served directly by this platform.
    pub fn is_externally_tracked(&self, format: ContentFormat) -> bool {
        !self.served_locally.contains(&format)
    }

    /// True when no other version of the item's document has ever been
    /// externally visible.
    pub fn is_first_external_version(&self, item: &ContentItem) -> bool {
        !item.tracked_by_external_store()
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
