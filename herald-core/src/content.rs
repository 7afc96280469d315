//! Content records and the read-only views assembled from them.
//!
//! The stored shape is a [`DocumentRecord`] holding every edition of a
//! document, plus standalone [`UnpublishingRecord`]s. Lookups assemble a
//! [`ContentItem`] (one edition plus the document's version history) or an
//! [`Unpublishing`] (the record plus the current state of its edition).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    ContentFormat, ContentState, DocumentId, EditionId, EntityRef, Locale, UnpublishingId,
};

// ---------------------------------------------------------------------------
// Stored records
// ---------------------------------------------------------------------------

/// Translated fields of an edition in a single locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Translation {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub body: String,
}

impl Translation {
    pub fn new(title: impl Into<String>, summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            body: body.into(),
        }
    }
}

/// One stored edition of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionRecord {
    pub id: EditionId,
    pub format: ContentFormat,
    #[serde(default)]
    pub state: ContentState,
    pub primary_locale: Locale,
    #[serde(default)]
    pub translations: BTreeMap<Locale, Translation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_publication: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_updated_at: Option<DateTime<Utc>>,
}

impl EditionRecord {
    pub fn new(id: u64, format: ContentFormat, primary_locale: impl Into<Locale>) -> Self {
        Self {
            id: EditionId(id),
            format,
            state: ContentState::Draft,
            primary_locale: primary_locale.into(),
            translations: BTreeMap::new(),
            scheduled_publication: None,
            first_published_at: None,
            public_updated_at: None,
        }
    }

    pub fn with_state(mut self, state: ContentState) -> Self {
        self.state = state;
        self
    }

    pub fn with_translation(mut self, locale: impl Into<Locale>, translation: Translation) -> Self {
        self.translations.insert(locale.into(), translation);
        self
    }

    pub fn scheduled_for(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_publication = Some(at);
        self
    }

    pub fn first_published(mut self, at: DateTime<Utc>) -> Self {
        self.first_published_at = Some(at);
        self.public_updated_at.get_or_insert(at);
        self
    }
}

/// A document and every edition it has had.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub slug: String,
    #[serde(default)]
    pub editions: Vec<EditionRecord>,
}

impl DocumentRecord {
    pub fn new(id: u64, slug: impl Into<String>) -> Self {
        Self {
            id: DocumentId(id),
            slug: slug.into(),
            editions: Vec::new(),
        }
    }

    pub fn with_edition(mut self, edition: EditionRecord) -> Self {
        self.editions.push(edition);
        self
    }

    pub fn contains(&self, edition: EditionId) -> bool {
        self.editions.iter().any(|e| e.id == edition)
    }

    /// Assemble the [`ContentItem`] view of one edition, or `None` if this
    /// document has no such edition.
    pub fn content_item(&self, edition: EditionId) -> Option<ContentItem> {
        let record = self.editions.iter().find(|e| e.id == edition)?;
        let versions = self
            .editions
            .iter()
            .map(|e| VersionRecord {
                edition_id: e.id,
                state: e.state,
                first_published_at: e.first_published_at,
            })
            .collect();

        Some(ContentItem {
            id: record.id,
            document: Document {
                id: self.id,
                slug: self.slug.clone(),
                versions,
            },
            format: record.format,
            state: record.state,
            primary_locale: record.primary_locale.clone(),
            translations: record.translations.clone(),
            scheduled_publication: record.scheduled_publication,
            first_published_at: record.first_published_at,
            public_updated_at: record.public_updated_at,
        })
    }
}

/// A stored unpublishing, pointing at the edition it removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpublishingRecord {
    pub id: UnpublishingId,
    pub edition_id: EditionId,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_target: Option<String>,
    pub unpublished_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Assembled views
// ---------------------------------------------------------------------------

/// History entry for one edition of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub edition_id: EditionId,
    pub state: ContentState,
    pub first_published_at: Option<DateTime<Utc>>,
}

impl VersionRecord {
    /// Whether this version is, or at some point was, on the public site.
    pub fn was_externally_visible(&self) -> bool {
        self.state.is_publicly_visible() || self.first_published_at.is_some()
    }
}

/// Document identity plus its version history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub slug: String,
    pub versions: Vec<VersionRecord>,
}

/// One edition of a document, with everything the engine reads about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: EditionId,
    pub document: Document,
    pub format: ContentFormat,
    pub state: ContentState,
    pub primary_locale: Locale,
    pub translations: BTreeMap<Locale, Translation>,
    pub scheduled_publication: Option<DateTime<Utc>>,
    pub first_published_at: Option<DateTime<Utc>>,
    pub public_updated_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Translated locales in ascending code order.
    pub fn locales(&self) -> Vec<Locale> {
        self.translations.keys().cloned().collect()
    }

    pub fn is_primary(&self, locale: &Locale) -> bool {
        &self.primary_locale == locale
    }

    /// Translation for `locale`, falling back to the primary locale.
    pub fn translation(&self, locale: &Locale) -> Option<&Translation> {
        self.translations
            .get(locale)
            .or_else(|| self.translations.get(&self.primary_locale))
    }

    /// True when a version earlier than this one (in the document's edition
    /// order) has ever been made externally visible. Derived from history,
    /// never stored.
    pub fn tracked_by_external_store(&self) -> bool {
        self.document
            .versions
            .iter()
            .take_while(|v| v.edition_id != self.id)
            .any(VersionRecord::was_externally_visible)
    }
}

/// An unpublishing with the current state of the edition it removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unpublishing {
    pub id: UnpublishingId,
    pub edition: ContentItem,
    pub explanation: String,
    pub redirect_target: Option<String>,
    pub unpublished_at: DateTime<Utc>,
}

impl Unpublishing {
    pub fn from_record(record: &UnpublishingRecord, edition: ContentItem) -> Self {
        Self {
            id: record.id,
            edition,
            explanation: record.explanation.clone(),
            redirect_target: record.redirect_target.clone(),
            unpublished_at: record.unpublished_at,
        }
    }
}

/// Match type of a redirect route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    #[default]
    Exact,
    Prefix,
}

/// One `(path, match_type, destination)` entry of a [`Redirect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRoute {
    pub path: String,
    #[serde(rename = "type")]
    pub route_type: RouteType,
    pub destination: String,
}

/// Ad-hoc redirect published synchronously. Route order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub base_path: String,
    pub redirects: Vec<RedirectRoute>,
}

impl Redirect {
    pub fn new(base_path: impl Into<String>, redirects: Vec<RedirectRoute>) -> Self {
        Self {
            base_path: base_path.into(),
            redirects,
        }
    }
}

/// Anything the orchestrator can fan out publish jobs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Publishable {
    ContentItem(ContentItem),
    Unpublishing(Unpublishing),
}

impl Publishable {
    pub fn entity_ref(&self) -> EntityRef {
        match self {
            Publishable::ContentItem(item) => EntityRef::ContentItem(item.id),
            Publishable::Unpublishing(u) => EntityRef::Unpublishing(u.id),
        }
    }

    /// The edition whose translations drive locale fan-out.
    pub fn content_item(&self) -> &ContentItem {
        match self {
            Publishable::ContentItem(item) => item,
            Publishable::Unpublishing(u) => &u.edition,
        }
    }

    pub fn locales(&self) -> Vec<Locale> {
        self.content_item().locales()
    }
}

impl From<ContentItem> for Publishable {
    fn from(item: ContentItem) -> Self {
        Publishable::ContentItem(item)
    }
}

impl From<Unpublishing> for Publishable {
    fn from(u: Unpublishing) -> Self {
        Publishable::Unpublishing(u)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
