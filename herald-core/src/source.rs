//! Read access to content, as the engine sees it.
//!
//! [`ContentSource`] is the boundary between the sync engine and whatever
//! owns the content database. Every call re-reads current state; nothing is
//! cached across calls.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::content::{ContentItem, DocumentRecord, Unpublishing, UnpublishingRecord};
use crate::error::ContentError;
use crate::types::{DocumentId, EditionId, UnpublishingId};

/// Read-only lookup of content by identifier.
pub trait ContentSource: Send + Sync {
    /// The current state of an edition, or `None` if it no longer exists.
    fn content_item(&self, id: EditionId) -> Result<Option<ContentItem>, ContentError>;

    /// The current state of an unpublishing (and its edition), or `None`.
    fn unpublishing(&self, id: UnpublishingId) -> Result<Option<Unpublishing>, ContentError>;
}

/// Resolve an unpublishing record against the documents that hold its edition.
pub fn resolve_unpublishing<'a>(
    record: &UnpublishingRecord,
    documents: impl IntoIterator<Item = &'a DocumentRecord>,
) -> Result<Unpublishing, ContentError> {
    documents
        .into_iter()
        .find_map(|doc| doc.content_item(record.edition_id))
        .map(|edition| Unpublishing::from_record(record, edition))
        .ok_or(ContentError::DanglingEdition {
            unpublishing: record.id.0,
            edition: record.edition_id.0,
        })
}

/// In-memory content source. Writers replace whole documents, mirroring how
/// the CRUD layer saves an edition.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: RwLock<BTreeMap<DocumentId, DocumentRecord>>,
    unpublishings: RwLock<BTreeMap<UnpublishingId, UnpublishingRecord>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub fn put_document(&self, document: DocumentRecord) {
        let mut docs = self.documents.write().unwrap_or_else(|e| e.into_inner());
        docs.insert(document.id, document);
    }

    pub fn remove_document(&self, id: DocumentId) {
        let mut docs = self.documents.write().unwrap_or_else(|e| e.into_inner());
        docs.remove(&id);
    }

    pub fn put_unpublishing(&self, record: UnpublishingRecord) {
        let mut records = self.unpublishings.write().unwrap_or_else(|e| e.into_inner());
        records.insert(record.id, record);
    }

    /// Snapshot of a stored document, for callers that mutate and re-put it.
    pub fn document(&self, id: DocumentId) -> Option<DocumentRecord> {
        let docs = self.documents.read().unwrap_or_else(|e| e.into_inner());
        docs.get(&id).cloned()
    }

}

impl ContentSource for MemorySource {
    fn content_item(&self, id: EditionId) -> Result<Option<ContentItem>, ContentError> {
        let docs = self.documents.read().unwrap_or_else(|e| e.into_inner());
        Ok(docs.values().find_map(|doc| doc.content_item(id)))
    }

    fn unpublishing(&self, id: UnpublishingId) -> Result<Option<Unpublishing>, ContentError> {
        let records = self.unpublishings.read().unwrap_or_else(|e| e.into_inner());
        let Some(record) = records.get(&id) else {
            return Ok(None);
        };
        let docs = self.documents.read().unwrap_or_else(|e| e.into_inner());
        resolve_unpublishing(record, docs.values()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::content::{EditionRecord, Translation};
    use crate::types::{ContentFormat, ContentState, Locale};

    fn source() -> MemorySource {
        let source = MemorySource::new();
        source.put_document(
            DocumentRecord::new(1, "school-meals").with_edition(
                EditionRecord::new(10, ContentFormat::CaseStudy, "en")
                    .with_state(ContentState::Published)
                    .with_translation("en", Translation::new("Meals", "", "")),
            ),
        );
        source
    }

    #[test]
    fn reads_reflect_latest_write() {
        let source = source();
        let mut doc = source.document(DocumentId(1)).expect("doc");
        doc.editions[0]
            .translations
            .insert("en".into(), Translation::new("Better meals", "", ""));
        source.put_document(doc);

        let item = source.content_item(EditionId(10)).expect("read").expect("item");
        assert_eq!(item.translations[&Locale::from("en")].title, "Better meals");
    }

    #[test]
    fn unpublishing_resolves_current_edition() {
        let source = source();
        source.put_unpublishing(UnpublishingRecord {
            id: UnpublishingId(5),
            edition_id: EditionId(10),
            explanation: "Superseded".into(),
            redirect_target: None,
            unpublished_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        });
        let u = source.unpublishing(UnpublishingId(5)).expect("read").expect("found");
        assert_eq!(u.edition.id, EditionId(10));
    }

    #[test]
    fn dangling_unpublishing_is_an_error() {
        let source = MemorySource::new();
        source.put_unpublishing(UnpublishingRecord {
            id: UnpublishingId(5),
            edition_id: EditionId(77),
            explanation: String::new(),
            redirect_target: None,
            unpublished_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        });
        let err = source.unpublishing(UnpublishingId(5)).unwrap_err();
        assert!(matches!(err, ContentError::DanglingEdition { edition: 77, .. }), "got: {err}");
    }

    #[test]
    fn removed_document_is_missing() {
        let source = source();
        source.remove_document(DocumentId(1));
        assert!(source.content_item(EditionId(10)).expect("read").is_none());
    }
}
